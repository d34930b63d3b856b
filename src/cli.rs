use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "pricesignal")]
#[command(about = "Multi-timeframe buy/sell/neutral signal for crypto assets", long_about = None)]
pub struct Cli {
    /// Asset preset (btc, eth)
    #[arg(short, long, global = true, default_value = "btc")]
    pub asset: String,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate 1h / 4h / 1d and print the master signal
    Signal,
    /// Fetch one series and print its latest indicator values
    Indicators {
        /// Resolution: 1h or 1d
        #[arg(short, long, default_value = "1d")]
        resolution: String,

        /// Lookback window in days (default from config)
        #[arg(short, long)]
        window_days: Option<u32>,
    },
    /// Signal plus fear & greed index
    Dashboard,
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Signal => {
            commands::signal::run(cli.asset, cli.json).await;
        }
        Commands::Indicators {
            resolution,
            window_days,
        } => {
            commands::indicators::run(cli.asset, resolution, window_days, cli.json).await;
        }
        Commands::Dashboard => {
            commands::dashboard::run(cli.asset, cli.json).await;
        }
    }
}
