use anyhow::Result;
use cliclack::spinner;
use console::style;

use agentic::agents::reflection::ReflectionAgent;
use agentic::providers::configs::ProviderConfig;
use agentic::providers::factory::get_provider;

use super::render;

pub fn execute(
    config: ProviderConfig,
    request: &str,
    generation_prompt: &str,
    reflection_prompt: &str,
    steps: usize,
) -> Result<()> {
    println!(
        "{} {}",
        style("Reflection agent").bold().green(),
        style(format!("- {} - up to {} steps", config.model(), steps)).dim()
    );

    let agent = ReflectionAgent::new(get_provider(config)?);

    let spin = spinner();
    spin.start("generating and critiquing");
    let result = agent.run(request, generation_prompt, reflection_prompt, steps);
    spin.stop("");

    render(&result?)?;
    println!();
    Ok(())
}
