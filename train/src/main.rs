use anyhow::{Context, Result};
use std::{env, path::PathBuf};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};
use train::{config::Config, Target};

#[derive(Debug, Clone, StructOpt)]
/// Train the spaceship prediction models
struct Args {
    #[structopt(long, default_value = "train.json5")]
    /// configuration file
    pub config_file: PathBuf,
    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, StructOpt)]
enum Command {
    /// Train one model: base, detection, position, angle or area
    Train { model: Target },
    /// Train the base model and all heads, then combine the heads
    All,
    /// Combine trained heads into one model
    Combine,
    /// Save rendered training images of a model
    Preview {
        model: Target,
        #[structopt(long, default_value = "8")]
        count: usize,
        #[structopt(long, default_value = "preview")]
        output_dir: PathBuf,
    },
}

pub fn main() -> Result<()> {
    // setup tracing
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true).compact();
    let filter_layer = {
        let filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            filter.add_directive(LevelFilter::INFO.into())
        } else {
            filter
        }
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    // parse arguments
    let Args {
        config_file,
        command,
    } = Args::from_args();
    let config = Config::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;

    match command {
        Command::Train { model } => {
            train::train(&config, model)?;
        }
        Command::All => {
            train::train_all(&config)?;
        }
        Command::Combine => {
            train::combine(&config)?;
        }
        Command::Preview {
            model,
            count,
            output_dir,
        } => {
            train::preview(&config, model, count, output_dir)?;
        }
    }

    Ok(())
}
