use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select};
use relay_core::config::{self, Config};

const PROVIDERS: &[&str] = &["openai", "openrouter"];
const MODELS: &[&str] = &["gpt-3.5-turbo-0125", "gpt-4o-mini", "gpt-4o"];

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

fn setup_provider() -> Result<String> {
    let selection = Select::new()
        .with_prompt("Select your provider")
        .items(PROVIDERS)
        .default(0)
        .interact()
        .context("Failed to select provider")?;

    Ok(PROVIDERS[selection].to_string())
}

fn setup_api_key(provider: &str) -> Result<String> {
    let api_key: String = Input::new()
        .with_prompt(format!("Enter your {provider} API key (empty to use the environment)"))
        .allow_empty(true)
        .interact_text()
        .context("Failed to read API key")?;

    Ok(api_key.trim().to_string())
}

fn setup_model() -> Result<String> {
    let selection = Select::new()
        .with_prompt("Select your model")
        .items(MODELS)
        .default(0)
        .interact()
        .context("Failed to select model")?;

    Ok(MODELS[selection].to_string())
}

pub fn run_onboard() -> Result<Config> {
    println!("  {}", style("relay setup").white().bold());
    println!(
        "  {}",
        style("Answers are written to the relay config file.").dim()
    );

    print_step(1, 3, "Provider");
    let provider = setup_provider()?;

    print_step(2, 3, "API Key");
    let api_key = setup_api_key(&provider)?;

    print_step(3, 3, "Model");
    let model = setup_model()?;

    let config = Config {
        provider: Some(provider),
        api_key,
        model,
        ..Config::load_or_init()?
    };

    println!();
    println!("  {} Configuration complete!", style("✓").green().bold());
    println!(
        "  {} Config saved to {}",
        style("→").green(),
        style(config::get_config_path().display()).cyan()
    );
    println!(
        "  {} You can now run: {}",
        style("→").green(),
        style("relay chat").cyan().bold()
    );
    println!();

    Ok(config)
}
