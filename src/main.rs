//! airq - Main Entry Point
//!
//! Train the air quality classifier and query it from the command line.

use airq::cli::{cmd_info, cmd_predict, cmd_train, cmd_vocab, training_config, Cli, Commands};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airq=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            artifacts,
            test_size,
            seed,
            max_depth,
            min_samples_split,
            strict,
        } => {
            let config = training_config(test_size, seed, max_depth, min_samples_split, strict);
            cmd_train(&data, &artifacts.paths(), config)?;
        }
        Commands::Predict {
            artifacts,
            json,
            data,
            output,
            report,
            observation,
        } => {
            cmd_predict(
                &artifacts.paths(),
                json.as_deref(),
                data.as_deref(),
                output.as_deref(),
                report.as_deref(),
                &observation,
            )?;
        }
        Commands::Vocab { vocab, field } => {
            cmd_vocab(&vocab, field.as_deref())?;
        }
        Commands::Info { data } => {
            cmd_info(&data)?;
        }
    }

    Ok(())
}
