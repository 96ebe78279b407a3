use std::{path::PathBuf, process::ExitCode};

use anyhow::{bail, Context as _};
use clap::{command, value_parser, Arg, ArgAction, ArgMatches};
use context::{Context, MetadataPolicy, SortOrder};
use generator::generate;
use log::{error, info, log_enabled, Level};

mod context;
mod generator;
mod metadata;
mod renderer;

fn path_arg(matches: &ArgMatches, id: &str) -> anyhow::Result<PathBuf> {
    matches
        .get_one::<PathBuf>(id)
        .cloned()
        .with_context(|| format!("{id} is required"))
}

fn run() -> anyhow::Result<()> {
    let matches = command!()
        .args([
            Arg::new("article_dir")
                .long("articles")
                .help("Directory of markdown articles")
                .value_parser(value_parser!(PathBuf))
                .default_value("articles"),
            Arg::new("out_dir")
                .long("out")
                .short('o')
                .help(
                    "Directory path of output. Article pages go to its `articles` subdirectory. \
                     Without --clean, pages of deleted articles are left in place.",
                )
                .value_parser(value_parser!(PathBuf))
                .default_value("public"),
            Arg::new("template_dir")
                .long("templates")
                .help("Directory of templates")
                .value_parser(value_parser!(PathBuf))
                .default_value("templates"),
            Arg::new("article_template")
                .long("article-template")
                .help("File name of the article template, relative to the template directory")
                .value_parser(value_parser!(PathBuf))
                .default_value("template.html"),
            Arg::new("index_template")
                .long("index-template")
                .help("File name of the index template, relative to the template directory")
                .value_parser(value_parser!(PathBuf))
                .default_value("index_template.html"),
            Arg::new("static_dir")
                .long("static")
                .help("Directory whose contents are copied into the output as they are")
                .value_parser(value_parser!(PathBuf)),
            Arg::new("sort")
                .long("sort")
                .help("Order of the index page")
                .value_parser(["listing", "date"])
                .default_value("listing"),
            Arg::new("strict_metadata")
                .long("strict-metadata")
                .help("Fail when an article does not start with a `!!!date!!time!!author!!!` line")
                .action(ArgAction::SetTrue),
            Arg::new("raw_metadata")
                .long("raw-metadata")
                .help("Insert title, date, time and author into pages without HTML escaping")
                .action(ArgAction::SetTrue),
            Arg::new("clean")
                .long("clean")
                .help(
                    "Remove the output directory before building. \
                     Refused when it contains the articles, templates or static directory.",
                )
                .action(ArgAction::SetTrue),
        ])
        .get_matches();

    let article_dir = path_arg(&matches, "article_dir")?;
    if !article_dir.is_dir() {
        bail!("article_dir({article_dir:?}) must be a directory.");
    }
    let out_dir = path_arg(&matches, "out_dir")?;
    if out_dir.exists() && !out_dir.is_dir() {
        bail!("if out_dir({out_dir:?}) exists, it must be a directory.");
    }
    let template_dir = path_arg(&matches, "template_dir")?;
    if !template_dir.is_dir() {
        bail!("template_dir({template_dir:?}) must be a directory.");
    }
    let static_dir = matches.get_one::<PathBuf>("static_dir").cloned();
    if let Some(dir) = &static_dir {
        if !dir.is_dir() {
            bail!("static_dir({dir:?}) must be a directory.");
        }
    }

    let mut ctx = Context::new(
        article_dir,
        out_dir,
        template_dir.join(path_arg(&matches, "article_template")?),
        template_dir.join(path_arg(&matches, "index_template")?),
    );
    ctx.static_dir = static_dir;
    ctx.clean = matches.get_flag("clean");
    ctx.escape_metadata = !matches.get_flag("raw_metadata");
    if matches.get_flag("strict_metadata") {
        ctx.metadata_policy = MetadataPolicy::Strict;
    }
    if matches.get_one::<String>("sort").map(String::as_str) == Some("date") {
        ctx.sort = SortOrder::Date;
    }

    info!("Starting build...");
    let articles = generate(&ctx)?;
    info!("Build complete: {} articles in {:?}", articles.len(), ctx.out_dir);

    Ok(())
}

fn failure_message(e: &anyhow::Error) -> String {
    format!("Build failed: {e:?}")
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // stderr gets the message even when RUST_LOG filters errors out
            if log_enabled!(Level::Error) {
                error!("{}", failure_message(&e));
            } else {
                eprintln!("{}", failure_message(&e));
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn failure_message_has_whole_chain() {
        let err = anyhow!("No such file or directory").context("while loading template \"t.html\"");
        let message = failure_message(&err);
        assert!(message.starts_with("Build failed: while loading template"));
        assert!(message.contains("No such file or directory"));
    }
}
