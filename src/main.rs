use std::process::ExitCode;
use std::sync::Arc;

use alerts_lib::config::AppConfig;
use alerts_lib::engine::snapshot::JsonFileProvider;
use alerts_lib::error::AppError;
use alerts_lib::{build_engine, logging, AlertFeed};

const USAGE: &str = "\
Usage: finance-alerts <command> [args]

Commands:
  feed <snapshot.json>       Print the ranked alert feed as JSON
  summary <snapshot.json>    Print badge counts for the feed
  read <id>                  Mark one alert as read
  read-all <snapshot.json>   Mark every alert in the current feed as read
  dismiss <id>               Dismiss one alert
  clear <snapshot.json>      Dismiss every alert in the current feed";

enum Command {
    Feed(String),
    Summary(String),
    Read(String),
    ReadAll(String),
    Dismiss(String),
    Clear(String),
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        let (name, arg) = match args {
            [name, arg] => (name.as_str(), arg.clone()),
            _ => return None,
        };
        Some(match name {
            "feed" => Command::Feed(arg),
            "summary" => Command::Summary(arg),
            "read" => Command::Read(arg),
            "read-all" => Command::ReadAll(arg),
            "dismiss" => Command::Dismiss(arg),
            "clear" => Command::Clear(arg),
            _ => return None,
        })
    }

    /// Snapshot file for commands that need a fresh feed.
    fn snapshot_path(&self) -> Option<&str> {
        match self {
            Command::Feed(p) | Command::Summary(p) | Command::ReadAll(p) | Command::Clear(p) => {
                Some(p)
            }
            Command::Read(_) | Command::Dismiss(_) => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = AppConfig::from_env();
    logging::init(config.log_format);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = Command::parse(&args) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(&config, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("{}", serde_json::to_string(&e).unwrap_or_else(|_| e.to_string()));
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &AppConfig, command: Command) -> Result<(), AppError> {
    let provider = Arc::new(JsonFileProvider::new(command.snapshot_path().unwrap_or_default()));
    let engine = build_engine(config, provider)?;
    let now = chrono::Utc::now();

    match command {
        Command::Feed(_) => {
            let feed = engine.refresh_feed(now).await;
            print_json(feed.alerts())?;
        }
        Command::Summary(_) => {
            let feed = engine.refresh_feed(now).await;
            print_json(&feed.summary())?;
        }
        Command::ReadAll(_) => {
            let mut feed = engine.refresh_feed(now).await;
            engine.mark_all_read(&mut feed);
            print_json(&feed.summary())?;
        }
        Command::Clear(_) => {
            let mut feed = engine.refresh_feed(now).await;
            let cleared = feed.len();
            engine.clear_all(&mut feed);
            tracing::info!(cleared, "Feed cleared");
        }
        // Single-id mutations don't need the data layer.
        Command::Read(id) => engine.mark_read(&mut AlertFeed::default(), &id),
        Command::Dismiss(id) => engine.dismiss(&mut AlertFeed::default(), &id),
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
