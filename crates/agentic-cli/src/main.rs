mod commands;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use agentic::agents::reflection::DEFAULT_STEPS;
use agentic::providers::configs::ProviderConfig;
use agentic::providers::factory::{load_config, ProviderType};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Provider option (groq or open-ai)
    #[arg(short, long, default_value = "groq", global = true)]
    provider: ProviderType,

    /// Model to use, overriding GROQ_MODEL / OPENAI_MODEL
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refine an answer by alternating generation and critique
    Reflect {
        /// What the generator should produce
        request: String,

        /// Persona prepended to the generator's instructions
        #[arg(long, default_value = "")]
        generation_prompt: String,

        /// Persona prepended to the critic's instructions
        #[arg(long, default_value = "")]
        reflection_prompt: String,

        /// Maximum number of generate/critique rounds
        #[arg(short = 'n', long, default_value_t = DEFAULT_STEPS)]
        steps: usize,
    },

    /// Answer a request with access to the built-in tools
    Tool {
        /// Request to answer; starts an interactive session when omitted
        request: Option<String>,
    },

    /// List the models served by the provider
    Models,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = provider_config(cli.provider, cli.model.as_deref())?;

    match cli.command {
        Command::Reflect {
            request,
            generation_prompt,
            reflection_prompt,
            steps,
        } => commands::reflect::execute(
            config,
            &request,
            &generation_prompt,
            &reflection_prompt,
            steps,
        ),
        Command::Tool { request } => commands::tool::execute(config, request.as_deref()),
        Command::Models => commands::models::execute(config),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn provider_config(provider: ProviderType, model: Option<&str>) -> Result<ProviderConfig> {
    let config = load_config(provider)?;

    Ok(match model {
        Some(model) => config.with_model(model),
        None => config,
    })
}
