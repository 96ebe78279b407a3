/// Marks both ends of the metadata line: `!!!date!!time!!author!!!`.
const FENCE: &str = "!!!";
const FIELD_SEPARATOR: &str = "!!";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ArticleMetadata {
    pub date: String,
    pub time: String,
    pub author: String,
}

/// An article source split into its metadata line and markdown body.
///
/// `meta` is `None` when the first line is not a valid metadata line. In that
/// case `body` is the whole input, so nothing is lost.
#[derive(Debug)]
pub(crate) struct ParsedArticle<'a> {
    pub meta: Option<ArticleMetadata>,
    pub body: &'a str,
}

impl ArticleMetadata {
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_start_matches('\u{feff}').trim();
        let inner = line.strip_prefix(FENCE)?.strip_suffix(FENCE)?;

        let mut fields = inner.split(FIELD_SEPARATOR);
        match (fields.next(), fields.next(), fields.next()) {
            (Some(date), Some(time), Some(author)) => Some(Self {
                date: date.to_string(),
                time: time.to_string(),
                author: author.to_string(),
            }),
            _ => None,
        }
    }
}

pub(crate) fn split_metadata(content: &str) -> ParsedArticle<'_> {
    let (first_line, rest) = content.split_once('\n').unwrap_or((content, ""));

    match ArticleMetadata::parse_line(first_line) {
        Some(meta) => ParsedArticle {
            meta: Some(meta),
            body: rest,
        },
        None => ParsedArticle {
            meta: None,
            body: content,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(date: &str, time: &str, author: &str) -> ArticleMetadata {
        ArticleMetadata {
            date: date.to_string(),
            time: time.to_string(),
            author: author.to_string(),
        }
    }

    #[test]
    fn well_formed_line() {
        let parsed = split_metadata("!!!2024-01-01!!5 min!!Jane!!!\n# Hi\n");
        assert_eq!(parsed.meta, Some(meta("2024-01-01", "5 min", "Jane")));
        assert_eq!(parsed.body, "# Hi\n");
    }

    #[test]
    fn crlf_line_ending() {
        let parsed = split_metadata("!!!2024-01-01!!5 min!!Jane!!!\r\nbody\r\n");
        assert_eq!(parsed.meta, Some(meta("2024-01-01", "5 min", "Jane")));
        assert_eq!(parsed.body, "body\r\n");
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let parsed = split_metadata("\u{feff}!!!d!!t!!a!!!\nbody");
        assert_eq!(parsed.meta, Some(meta("d", "t", "a")));
    }

    #[test]
    fn metadata_only() {
        let parsed = split_metadata("!!!d!!t!!a!!!");
        assert_eq!(parsed.meta, Some(meta("d", "t", "a")));
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn extra_fields_are_ignored() {
        assert_eq!(
            ArticleMetadata::parse_line("!!!d!!t!!a!!extra!!!"),
            Some(meta("d", "t", "a"))
        );
    }

    #[test]
    fn empty_fields_are_kept() {
        assert_eq!(
            ArticleMetadata::parse_line("!!!!!!!!!!!!"),
            Some(meta("", "", ""))
        );
    }

    #[test]
    fn too_few_fields() {
        let input = "!!!2024-01-01!!Jane!!!\n# Hi";
        let parsed = split_metadata(input);
        assert_eq!(parsed.meta, None);
        assert_eq!(parsed.body, input);
    }

    #[test]
    fn unterminated_line() {
        let input = "!!!2024-01-01!!5 min!!Jane\nText";
        let parsed = split_metadata(input);
        assert_eq!(parsed.meta, None);
        assert_eq!(parsed.body, input);
    }

    #[test]
    fn short_fences() {
        assert_eq!(ArticleMetadata::parse_line("!!!!!"), None);
        assert_eq!(ArticleMetadata::parse_line("!!!!!!"), None);
    }

    #[test]
    fn plain_markdown_keeps_everything() {
        let input = "# Title\n\nParagraph\n";
        let parsed = split_metadata(input);
        assert_eq!(parsed.meta, None);
        assert_eq!(parsed.body, input);
    }

    #[test]
    fn empty_input() {
        let parsed = split_metadata("");
        assert_eq!(parsed.meta, None);
        assert_eq!(parsed.body, "");
    }
}
