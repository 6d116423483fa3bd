use anyhow::Result;
use clap::{Parser, Subcommand};
use relay_core::dataset::DatasetGenerator;
use relay_core::{DispatchLoop, config, providers, tools};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod onboard;

const DEFAULT_MESSAGE: &str = "My registration number is 1000. What is my marks?";
const DEFAULT_INPUT: &str = "files/policy.txt";
const DEFAULT_OUTPUT: &str = "files/q_a.txt";

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "relay - LLM function calling and fine-tuning data generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write provider, key and model to the config file
    Onboard,
    /// Ask the model a question it may answer with the student tools
    Chat {
        #[arg(short, long, default_value = DEFAULT_MESSAGE)]
        message: String,
    },
    /// Generate question/answer training records from a document
    Generate {
        #[arg(short, long, default_value = DEFAULT_INPUT)]
        input: PathBuf,
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat {
        message: DEFAULT_MESSAGE.to_string(),
    });

    match command {
        Commands::Onboard => {
            let onboard_config = onboard::run_onboard().map_err(|e| {
                eprintln!("❌ Onboarding failed: {}", e);
                anyhow::anyhow!("Onboarding failed: {}", e)
            })?;
            config::save_config(&onboard_config)?;
        }
        Commands::Chat { message } => {
            let config = config::Config::load_or_init()?;
            let provider = providers::create_provider(&config)?;
            let registry = Arc::new(tools::student_registry()?);

            let dispatch =
                DispatchLoop::new(provider, registry).with_max_rounds(config.max_tool_rounds);

            match dispatch.run(&message).await {
                Ok(reply) => println!("{}", reply.text_or_empty()),
                Err(e) => {
                    eprintln!("❌ Error: {}", e);
                    anyhow::bail!("Dispatch failed: {}", e);
                }
            }
        }
        Commands::Generate { input, output } => {
            let config = config::Config::load_or_init()?;
            let provider = providers::create_provider(&config)?;

            let generator = DatasetGenerator::from_config(provider, &config.dataset, &output)?;
            let written = generator.run(&input).await?;
            println!(
                "✓ Appended {} question/answer records to {}",
                written,
                output.display()
            );
        }
    }

    Ok(())
}
