use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use notion_md_config::{Numbering, RichTextStyle};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "notion-md",
    about = "Render Notion pages as Markdown and review them",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a page (or any block with children) as Markdown
    Render {
        /// Page URL or block id
        page: String,
        /// Read blocks from a YAML/JSON fixture instead of the Notion API
        #[arg(long, value_name = "FILE")]
        fixture: Option<PathBuf>,
        /// Rich-text handling (overrides render.rich_text)
        #[arg(long, value_enum)]
        rich_text: Option<RichTextStyle>,
        /// Numbered list markers (overrides render.numbering)
        #[arg(long, value_enum)]
        numbering: Option<Numbering>,
        /// Write the Markdown to a file instead of stdout.
        /// Intermediate directories are created if needed.
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print the reviewable text of every prose block as JSON
    Text {
        /// Page URL or block id
        page: String,
        /// Read blocks from a YAML/JSON fixture instead of the Notion API
        #[arg(long, value_name = "FILE")]
        fixture: Option<PathBuf>,
    },
    /// Print the page title.  Exits non-zero when the page has none.
    Title {
        /// Page URL or page id
        page: String,
    },
    /// Check that a page exists and is shared with the integration.
    /// Exits 0 if accessible, non-zero otherwise.
    Validate {
        /// Page URL or page id
        page: String,
    },
    /// Add a comment to a block
    Comment {
        /// Block id to comment on
        block: String,
        /// Comment text
        text: String,
    },
    /// Print the effective configuration and exit
    ShowConfig,
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "notion-md", &mut std::io::stdout());
}
