use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueHint};

use caption_timeline::captions::{CaptionCommands, CaptionConfig, handle_caption_command};
use caption_timeline::ui::{self, prelude::*};

/// captl main parser
#[derive(Parser, Debug)]
#[command(name = "captl", author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format for events
    #[arg(long, value_enum, default_value = "text", global = true)]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CaptionCommands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let color = !cli.no_color && std::io::stdout().is_terminal();
    ui::init(cli.output, color);
    ui::set_debug_mode(cli.debug);

    if let Err(err) = run(cli).await {
        emit(
            Level::Error,
            "captl.error",
            &format!("Error: {err:#}"),
            Some(serde_json::json!({
                "chain": err.chain().map(|cause| cause.to_string()).collect::<Vec<_>>(),
            })),
        );
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CaptionConfig::load_or_default_path(cli.config.as_deref())?;
    emit(
        Level::Debug,
        "captl.config",
        &format!(
            "tick interval {}ms, playback rate {}",
            config.tick_interval_ms, config.playback_rate
        ),
        None,
    );
    handle_caption_command(cli.command, &config).await
}
