use anyhow::Result;
use cliclack::spinner;
use console::style;

use agentic::providers::configs::{OpenAiProviderConfig, ProviderConfig};
use agentic::providers::openai::OpenAiProvider;

pub fn execute(config: ProviderConfig) -> Result<()> {
    let config: OpenAiProviderConfig = match config {
        ProviderConfig::OpenAi(config) => config,
        ProviderConfig::Groq(config) => config.into(),
    };
    let selected = config.model.clone();
    let host = config.host.clone();
    let provider = OpenAiProvider::new(config)?;

    let spin = spinner();
    spin.start("fetching models");
    let models = provider.list_models();
    spin.stop("");

    let mut models = models?;
    models.sort();

    println!("{} {}", style("Models at").bold(), style(host).dim());
    for model in models {
        if model == selected {
            println!("  {} {}", style(&model).green().bold(), style("(selected)").dim());
        } else {
            println!("  {}", model);
        }
    }
    Ok(())
}
