mod cli;

use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use notion_md_client::{page_id_from_url, BlockSource, FixtureSource, NotionClient};
use notion_md_config::{Config, Numbering, RichTextStyle};
use notion_md_render::{extract_text, MarkdownRenderer, RenderOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Completions need no configuration
    if let Commands::Completions { shell } = &cli.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    let config = notion_md_config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Completions { .. } => Ok(()),
        Commands::ShowConfig => {
            println!("{}", serde_yaml::to_string(&config).unwrap_or_default());
            Ok(())
        }
        Commands::Render { page, fixture, rich_text, numbering, output } => {
            render_cmd(&config, &page, fixture.as_deref(), rich_text, numbering, output.as_deref())
                .await
        }
        Commands::Text { page, fixture } => text_cmd(&config, &page, fixture.as_deref()).await,
        Commands::Title { page } => title_cmd(&config, &page).await,
        Commands::Validate { page } => validate_cmd(&config, &page).await,
        Commands::Comment { block, text } => comment_cmd(&config, &block, &text).await,
    }
}

/// Pick the block source for a command: a fixture file when one is given,
/// otherwise the Notion API.  Returns the source together with the block id
/// to start from.  Fixture keys are used verbatim; anything else goes through
/// the page-id resolver so full page URLs are accepted.
fn block_source(
    config: &Config,
    page: &str,
    fixture: Option<&Path>,
) -> anyhow::Result<(Box<dyn BlockSource>, String)> {
    match fixture {
        Some(path) => {
            let source = FixtureSource::from_file(path)
                .with_context(|| format!("loading fixture {}", path.display()))?;
            Ok((Box::new(source), page.trim().to_string()))
        }
        None => Ok((Box::new(api_client(config)?), page_id_from_url(page))),
    }
}

fn api_client(config: &Config) -> anyhow::Result<NotionClient> {
    NotionClient::from_config(&config.notion).context("building Notion client")
}

async fn render_cmd(
    config: &Config,
    page: &str,
    fixture: Option<&Path>,
    rich_text: Option<RichTextStyle>,
    numbering: Option<Numbering>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let (source, root) = block_source(config, page, fixture)?;

    let mut options = RenderOptions::from(&config.render);
    if let Some(style) = rich_text {
        options.rich_text = style;
    }
    if let Some(numbering) = numbering {
        options.numbering = numbering;
    }
    debug!(root = %root, rich_text = %options.rich_text, numbering = %options.numbering, "rendering");

    let markdown = MarkdownRenderer::new(source.as_ref())
        .with_options(options)
        .render(&root)
        .await
        .with_context(|| format!("rendering {root}"))?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(path, format!("{markdown}\n"))
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => println!("{markdown}"),
    }
    Ok(())
}

async fn text_cmd(config: &Config, page: &str, fixture: Option<&Path>) -> anyhow::Result<()> {
    let (source, root) = block_source(config, page, fixture)?;
    let texts = extract_text(source.as_ref(), &root)
        .await
        .with_context(|| format!("extracting text from {root}"))?;
    println!("{}", serde_json::to_string_pretty(&texts)?);
    Ok(())
}

async fn title_cmd(config: &Config, page: &str) -> anyhow::Result<()> {
    let id = page_id_from_url(page);
    match api_client(config)?.page_title(&id).await {
        Some(title) => {
            println!("{title}");
            Ok(())
        }
        None => bail!("page {id} has no title or could not be retrieved"),
    }
}

async fn validate_cmd(config: &Config, page: &str) -> anyhow::Result<()> {
    let id = page_id_from_url(page);
    if api_client(config)?.page_exists(&id).await {
        println!("Page {id}: accessible");
        Ok(())
    } else {
        bail!("page {id} does not exist or is not shared with the integration")
    }
}

async fn comment_cmd(config: &Config, block: &str, text: &str) -> anyhow::Result<()> {
    api_client(config)?
        .create_comment(block, text)
        .await
        .with_context(|| format!("commenting on block {block}"))?;
    println!("Comment added to block {block}");
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
