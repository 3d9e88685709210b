use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};

use stockroom_cli::console::Console;
use stockroom_inventory::InventorySession;
use stockroom_observability::{LogFormat, ObservabilityConfig};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "In-memory inventory console")]
struct Cli {
    /// JSON configuration file (page size, categories, seed items).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Rows per page; overrides the configuration file.
    #[arg(long)]
    page_size: Option<usize>,
    /// Emit logs as JSON lines on stderr.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    stockroom_observability::init_with(
        &ObservabilityConfig::default()
            .with_verbosity(cli.verbose)
            .with_format(format),
    );

    let config = stockroom_cli::load_config(cli.config.as_deref(), cli.page_size)?;
    let session = InventorySession::new(&config).context("failed to load seed items")?;

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut console = Console::new(session, io::stdout().lock(), interactive);
    console.run(stdin.lock())
}
