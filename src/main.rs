use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use hostmond::store::TIMESTAMP_FORMAT;
use hostmond::{HostSource, MetricLog, Monitor, MonitorConfig};

#[derive(Parser, Debug)]
#[command(name = "hostmond", about = "Host resource monitor with threshold alerts")]
struct Args {
    /// Path to a TOML config file
    #[clap(long)]
    config: Option<PathBuf>,

    /// Override the metric log path
    #[clap(long)]
    log_path: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one sampling cycle and exit
    Once,
    /// Run continuously until interrupted
    Start {
        /// Seconds between cycles (0 means the 5s default)
        #[clap(long)]
        interval: Option<u64>,
    },
    /// Print a summary of the logged data
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(path) = args.log_path {
        config.log_path = Some(path);
    }
    let log = MetricLog::new(config.log_path());

    match args.command {
        Command::Once => {
            let mut monitor = Monitor::new(HostSource::new(), config.thresholds.clone(), log);
            if !monitor.run_once() {
                eprintln!("Failed to collect metrics.");
                std::process::exit(1);
            }
        }
        Command::Start { interval } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.interval());
            let mut monitor = Monitor::new(HostSource::new(), config.thresholds.clone(), log);

            let cancel = CancellationToken::new();
            let signal_cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    signal_cancel.cancel();
                }
            });

            let cycles = monitor.run_continuous(interval, cancel).await;
            println!("Monitoring stopped after {cycles} cycles.");
        }
        Command::Summary => match log.summarize()? {
            Some(summary) if summary.record_count > 0 => {
                println!("Total records: {}", summary.record_count);
                if let Some(first) = summary.first_timestamp {
                    println!("First entry: {}", first.format(TIMESTAMP_FORMAT));
                }
                if let Some(last) = summary.last_timestamp {
                    println!("Last entry:  {}", last.format(TIMESTAMP_FORMAT));
                }
            }
            Some(_) => println!("Log file is empty."),
            None => println!("No log file found. Run the monitor first."),
        },
    }

    Ok(())
}
