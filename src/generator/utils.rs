use std::{cmp::Ordering, sync::OnceLock};

use chrono::NaiveDate;
use maud::{html, Markup, PreEscaped};
use pulldown_cmark::{
    html::push_html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;

use super::data::ArticleRecord;
use crate::renderer::metadata_value;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(super) fn render_markdown(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let parser = TextMergeStream::new(Parser::new_ext(body, options));
    let mut html = String::with_capacity(body.len() * 2);
    push_html(&mut html, linkify(parser).into_iter());
    html
}

static BARE_URL: OnceLock<Regex> = OnceLock::new();

fn bare_url_pattern() -> &'static Regex {
    BARE_URL.get_or_init(|| Regex::new(r#"\b(?:https?://|www\.)[^\s<>"]+"#).unwrap())
}

/// Punctuation that ends a sentence rather than the URL.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\'', '"'];

fn push_text_with_links<'a>(text: &str, out: &mut Vec<Event<'a>>) {
    let mut last = 0;
    for m in bare_url_pattern().find_iter(text) {
        let url = m.as_str().trim_end_matches(URL_TRAILING);
        if url.ends_with("://") || url == "www." {
            continue;
        }
        if m.start() > last {
            out.push(Event::Text(text[last..m.start()].to_string().into()));
        }
        let dest_url = if url.starts_with("www.") {
            format!("http://{url}")
        } else {
            url.to_string()
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: dest_url.into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(url.to_string().into()));
        out.push(Event::End(TagEnd::Link));
        last = m.start() + url.len();
    }
    if last < text.len() {
        out.push(Event::Text(text[last..].to_string().into()));
    }
}

/// Turns bare `http(s)://` and `www.` URLs in text into links. Text inside
/// links, images and code blocks is left alone.
fn linkify<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = vec![];
    let mut link_depth = 0usize;
    let mut in_code_block = false;

    for event in events {
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => link_depth += 1,
            Event::End(TagEnd::Link | TagEnd::Image) => link_depth = link_depth.saturating_sub(1),
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(text) if link_depth == 0 && !in_code_block => {
                push_text_with_links(text, &mut out);
                continue;
            }
            _ => {}
        }
        out.push(event);
    }
    out
}

fn metadata_markup(value: &str, escape: bool) -> Markup {
    PreEscaped(metadata_value(value, escape))
}

/// One entry of the index listing.
pub(super) fn render_index_entry(article: &ArticleRecord, escape: bool) -> Markup {
    let title = metadata_markup(&article.title, escape);
    let date = metadata_markup(&article.meta.date, escape);
    let author = metadata_markup(&article.meta.author, escape);
    let time = metadata_markup(&article.meta.time, escape);

    html! {
        article class="bg-white p-6 rounded-2xl shadow hover:shadow-md transition" {
            h3 class="text-xl font-bold text-gray-900 mb-2" {
                a href=(article.url) class="hover:underline" { (title) }
            }
            p class="text-gray-500 text-sm mb-3" {
                (date) " · " (author) " · " (time) " read"
            }
            a href=(article.url) class="text-blue-600 font-medium hover:underline" { "Read more →" }
        }
    }
}

pub(super) fn render_index_entries(articles: &[ArticleRecord], escape: bool) -> String {
    articles
        .iter()
        .map(|article| render_index_entry(article, escape).into_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()
}

/// Newest first. Articles without a parsable date go last and keep their
/// relative order.
pub(super) fn sort_article(a: &ArticleRecord, b: &ArticleRecord) -> Ordering {
    match (parse_date(&a.meta.date), parse_date(&b.meta.date)) {
        (Some(ref a_date), Some(ref b_date)) => b_date.cmp(a_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
