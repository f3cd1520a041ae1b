mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use folio_core::chat::assistant::{parse_command, Command, SEND_NEEDS_CONTENT};
use folio_core::Config;
use tracing::{error, info};

use app::App;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Terminal portfolio with a logo marquee and a scripted chat assistant")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file (defaults to the user cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start without the logo strip
    #[arg(long)]
    no_marquee: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Relay a message to the site owner without opening the UI
    Send {
        /// Message text
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let log_file = match cli.log_file {
        Some(path) => path,
        None => logging::default_log_path()?,
    };
    logging::init(&config.log_level, &log_file)?;

    match cli.command {
        Some(Commands::Send { message }) => send_once(&config, &message.join(" ")).await,
        None => run_tui(config, !cli.no_marquee).await,
    }
}

/// `folio send ...`: the same relay the `!send` chat command uses.
async fn send_once(config: &Config, message: &str) -> Result<()> {
    let content = match parse_command(&format!("!send {}", message.trim())) {
        Command::Send(content) => content.to_string(),
        _ => bail!("{}", SEND_NEEDS_CONTENT),
    };

    let relay = config.relay_client();
    match relay.send_chat(&content).await {
        Ok(()) => {
            info!("message relayed from the command line");
            println!("Message sent.");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "command line relay failed");
            Err(e.into())
        }
    }
}

async fn run_tui(config: Config, mount_marquee: bool) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(config, mount_marquee);

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            if let Some(event) = events.next().await {
                handler::handle_event(&mut app, event).await?;
            }
            app.poll_tasks().await;
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    info!("folio exiting");
    result
}
