use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use phoneverify_agents::{build_pipeline, LlmSettings, PipelineMode, PipelineSettings};
use shared_types::{ValidationRequest, ValidationResponse};

#[derive(Parser, Debug)]
#[command(name = "validate-phone", about = "Validate a phone number and score it")]
struct Cli {
    /// Phone number, any formatting
    #[arg(long)]
    phone: String,

    /// Dialing code such as +1 or 44
    #[arg(long)]
    country_code: String,

    /// Use seeded simulated collaborators instead of the language model
    #[arg(long)]
    simulated: bool,

    #[arg(long)]
    seed: Option<u64>,

    /// Probability that a simulated collaborator call fails
    #[arg(long)]
    failure_rate: Option<f64>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CliConfig {
    api_keys: ApiKeysConfig,
    llm: LlmSettings,
    pipeline: PipelineSettings,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiKeysConfig {
    llm_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(get_config_path);
    let mut config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    if cli.simulated {
        config.pipeline.mode = PipelineMode::Simulated;
    }
    if cli.seed.is_some() {
        config.pipeline.seed = cli.seed;
    }
    if let Some(rate) = cli.failure_rate {
        config.pipeline.failure_rate = rate;
    }

    let pipeline = build_pipeline(
        &config.pipeline,
        &config.llm,
        config.api_keys.llm_api_key.as_deref(),
    )
    .context("Failed to build validation pipeline")?;

    let request = ValidationRequest::new(cli.phone, cli.country_code);
    let report = pipeline.run(&request).await?;

    let response: ValidationResponse = report.into();
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: &PathBuf) -> Result<CliConfig> {
    let builder = Config::builder()
        .add_source(File::from(path.clone()).required(false))
        .add_source(
            Environment::with_prefix("PHONEVERIFY")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(builder.try_deserialize()?)
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("phoneverify").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
