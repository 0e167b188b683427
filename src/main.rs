use cineindex_history::config::{HistoryConfig, HistoryConfigError};
use cineindex_history::event_logger::EventLogger;
use cineindex_history::history::{read_recent, RECENT_HISTORY_LIMIT};
use cineindex_history::json_logger::JsonLogger;
use cineindex_history::record::HistoryRecord;
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "cineindex-history")]
#[command(about = "Record and show mpv watch history as JSON Lines")]
struct Args {
    /// History file path (overrides CINEINDEX_HISTORY_FILE)
    #[arg(long)]
    history_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Follow a running mpv over its IPC socket and log every opened file
    Watch {
        /// Path of mpv's --input-ipc-server socket
        #[arg(short, long)]
        socket: PathBuf,
    },
    /// Show the most recently watched items
    History {
        /// Number of entries to show
        #[arg(short, long, default_value_t = RECENT_HISTORY_LIMIT)]
        limit: usize,
    },
    /// Append a single entry by hand
    Log {
        /// Display title
        #[arg(short, long, default_value = "")]
        name: String,

        /// Path or URL
        #[arg(short, long, default_value = "")]
        url: String,
    },
}

fn load_config(args: &Args) -> Result<HistoryConfig, HistoryConfigError> {
    HistoryConfig::load_with_override(args.history_file.clone())
}

#[cfg(unix)]
fn watch(
    config: Result<HistoryConfig, HistoryConfigError>,
    socket: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    use cineindex_history::ipc::IpcClient;

    let Some(logger) = EventLogger::init(config) else {
        return Ok(());
    };
    let mut client = IpcClient::connect(socket)?;
    logger.run(&mut client);
    info!("mpv went away, stopping");
    Ok(())
}

#[cfg(not(unix))]
fn watch(
    _config: Result<HistoryConfig, HistoryConfigError>,
    _socket: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    Err("watching mpv over IPC requires a unix socket".into())
}

fn show_history(config: &HistoryConfig, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let history = read_recent(&config.history_file, limit)?;
    if history.is_empty() {
        println!("No watch history yet.");
        return Ok(());
    }

    println!("=== Watch History (last {}) ===\n", history.len());
    for (i, record) in history.iter().enumerate() {
        println!("{:2}. {}", i + 1, record.name);
        println!("    {}", record.url);
        println!("    Played at: {}", record.time);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(&args);

    match &args.command {
        Commands::Watch { socket } => watch(config, socket)?,
        Commands::History { limit } => show_history(&config?, *limit)?,
        Commands::Log { name, url } => {
            let config = config?;
            let record = HistoryRecord::now(name.as_str(), url.as_str());
            let logger = JsonLogger::new(config.history_file);
            logger.log_record(&record)?;
            info!(
                "Logged '{}' at {} to {}",
                record.name,
                record.time,
                logger.path().display()
            );
        }
    }

    Ok(())
}
