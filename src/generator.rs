use std::{collections::HashMap, ffi::OsStr, path::Path};

use anyhow::{bail, Context as _};
use fs_extra::dir::CopyOptions;
use log::{debug, info, warn};

use crate::{
    context::{Context, MetadataPolicy, SortOrder},
    metadata::{split_metadata, ArticleMetadata},
    renderer::{metadata_value, Template},
};

mod data;
mod utils;

use data::{ArticleRecord, ARTICLES_DIR, INDEX_FILE};

const ARTICLE_PLACEHOLDERS: [&str; 5] = ["title", "date", "time", "author", "content"];
const INDEX_PLACEHOLDERS: [&str; 2] = ["articles", "articles_count"];

fn is_markdown(path: &Path) -> bool {
    path.is_file() && path.extension() == Some(OsStr::new("md"))
}

/// `--clean` must not remove anything the build reads from.
fn check_clean_target(ctx: &Context) -> anyhow::Result<()> {
    if !ctx.clean || !ctx.out_dir.exists() {
        return Ok(());
    }
    let out_dir = ctx
        .out_dir
        .canonicalize()
        .with_context(|| format!("while resolving {:?}", ctx.out_dir))?;

    let sources = [
        Some(&ctx.article_dir),
        Some(&ctx.article_template),
        Some(&ctx.index_template),
        ctx.static_dir.as_ref(),
    ];
    for source in sources.into_iter().flatten() {
        if let Ok(resolved) = source.canonicalize() {
            if resolved.starts_with(&out_dir) {
                bail!(
                    "refusing to clean {:?}: it contains the source {:?}",
                    ctx.out_dir,
                    source
                );
            }
        }
    }

    Ok(())
}

fn prepare_out_dir(ctx: &Context) -> anyhow::Result<()> {
    if ctx.clean && ctx.out_dir.exists() {
        info!("Removing {:?}", ctx.out_dir);
        fs_extra::dir::remove(&ctx.out_dir)
            .with_context(|| format!("while removing {:?}", ctx.out_dir))?;
    }
    fs_extra::dir::create_all(ctx.out_dir.join(ARTICLES_DIR), false)
        .with_context(|| format!("while creating {:?}", ctx.out_dir))?;

    if let Some(static_dir) = &ctx.static_dir {
        let mut cp_opts = CopyOptions::new();
        cp_opts.content_only = true;
        cp_opts.overwrite = true;
        fs_extra::dir::copy(static_dir, &ctx.out_dir, &cp_opts)
            .with_context(|| format!("while copying {static_dir:?}"))?;
        info!("Copied {static_dir:?} into {:?}", ctx.out_dir);
    }

    Ok(())
}

fn generate_article(
    ctx: &Context,
    template: &Template,
    md_path: &Path,
) -> anyhow::Result<ArticleRecord> {
    let content = std::fs::read_to_string(md_path)?;
    let parsed = split_metadata(&content);
    let meta = match parsed.meta {
        Some(meta) => meta,
        None if ctx.metadata_policy == MetadataPolicy::Strict => {
            bail!("missing or malformed metadata line (expected `!!!date!!time!!author!!!`)")
        }
        None => {
            warn!("{md_path:?}: no metadata line, using empty date/time/author");
            ArticleMetadata::default()
        }
    };
    debug!("{md_path:?}: {meta:?}");

    let Some(title) = md_path.file_stem().and_then(OsStr::to_str) else {
        bail!("file name is not valid UTF-8");
    };
    let title = title.to_string();
    let out_name = format!("{title}.html");
    let out_path = ctx.out_dir.join(ARTICLES_DIR).join(&out_name);

    let html_body = utils::render_markdown(parsed.body);

    let escape = ctx.escape_metadata;
    let bindings = HashMap::from([
        ("title", metadata_value(&title, escape)),
        ("date", metadata_value(&meta.date, escape)),
        ("time", metadata_value(&meta.time, escape)),
        ("author", metadata_value(&meta.author, escape)),
        ("content", html_body.clone()),
    ]);
    std::fs::write(&out_path, template.render(&bindings))
        .with_context(|| format!("while writing {out_path:?}"))?;

    Ok(ArticleRecord {
        url: format!("{ARTICLES_DIR}/{out_name}"),
        title,
        meta,
        path: out_path,
        html_body,
    })
}

fn generate_index(
    ctx: &Context,
    template: &Template,
    articles: &[ArticleRecord],
) -> anyhow::Result<()> {
    let bindings = HashMap::from([
        (
            "articles",
            utils::render_index_entries(articles, ctx.escape_metadata),
        ),
        ("articles_count", articles.len().to_string()),
    ]);

    let index_path = ctx.out_dir.join(INDEX_FILE);
    std::fs::write(&index_path, template.render(&bindings))
        .with_context(|| format!("while writing {index_path:?}"))?;
    info!("{INDEX_FILE} generated with {} articles", articles.len());

    Ok(())
}

/// Builds every article page and the index. Returns the articles in the order
/// they appear on the index.
pub(crate) fn generate(ctx: &Context) -> anyhow::Result<Vec<ArticleRecord>> {
    // templates first: a missing one must not leave a half-built site behind
    let article_template = Template::load(&ctx.article_template)?;
    article_template.check_placeholders(&ARTICLE_PLACEHOLDERS);
    let index_template = Template::load(&ctx.index_template)?;
    index_template.check_placeholders(&INDEX_PLACEHOLDERS);

    check_clean_target(ctx)?;
    prepare_out_dir(ctx)?;

    let mut articles = vec![];
    let entries = std::fs::read_dir(&ctx.article_dir)
        .with_context(|| format!("while reading {:?}", ctx.article_dir))?;
    for entry in entries {
        let path = entry?.path();
        if !is_markdown(&path) {
            debug!("Skipping {path:?}");
            continue;
        }

        let article = generate_article(ctx, &article_template, &path)
            .with_context(|| format!("while generating from {path:?}"))?;
        info!("{path:?} -> {:?}", article.path);
        debug!("{} bytes of article HTML", article.html_body.len());
        articles.push(article);
    }

    if ctx.sort == SortOrder::Date {
        articles.sort_by(utils::sort_article);
    }

    generate_index(ctx, &index_template, &articles)?;

    Ok(articles)
}
