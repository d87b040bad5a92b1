use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use pssst_chat::core::config;
use pssst_chat::messaging::PssstClient;
use pssst_chat::tui::{self, SessionEnd};

const LICENSE: &str = include_str!("../LICENSE");

#[derive(Parser)]
#[command(
    name = "pssst-chat",
    about = "Terminal chat client for the Pssst secure-messaging protocol"
)]
struct Args {
    /// Profile username to chat as
    username: Option<String>,

    /// Print the license and exit
    #[arg(short = 'l', long)]
    license: bool,

    /// Print the version and exit
    #[arg(short = 'v', long)]
    version: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - the terminal surface belongs to the TUI,
    // so logs go to pssst-chat.log in the current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("pssst-chat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    if args.license {
        println!("{}", LICENSE.trim());
        return ExitCode::SUCCESS;
    }
    if args.version {
        println!("Pssst Chat {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }
    let Some(username) = args.username else {
        let _ = Args::command().print_help();
        return ExitCode::SUCCESS;
    };

    log::info!("Pssst Chat starting up as {}", username);

    match run(&username).await {
        Ok(SessionEnd::Exited) => ExitCode::SUCCESS,
        Ok(SessionEnd::Interrupted) => {
            println!("Abort");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the session from config + CLI and runs it to completion.
/// Profile resolution happens before any terminal mode change, so a missing
/// profile aborts with a plain error line.
async fn run(username: &str) -> Result<SessionEnd, Box<dyn std::error::Error>> {
    let config = config::load_config()?;
    let profile = config::resolve(&config, Some(username))?;
    let client = Arc::new(PssstClient::new(profile));
    Ok(tui::run(client).await?)
}
