use anyhow::Result;
use cliclack::{input, spinner};
use console::style;

use agentic::agents::tool_agent::ToolAgent;
use agentic::providers::configs::ProviderConfig;
use agentic::providers::factory::get_provider;

use super::render;
use crate::tools::builtin_tools;

pub fn execute(config: ProviderConfig, request: Option<&str>) -> Result<()> {
    let model = config.model().to_string();
    let agent = ToolAgent::new(get_provider(config)?, builtin_tools())?;

    let names: Vec<&str> = agent.tools().map(|tool| tool.name()).collect();
    println!(
        "{} {}",
        style("Tool agent").bold().green(),
        style(format!("- {} - tools: {}", model, names.join(", "))).dim()
    );

    if let Some(request) = request {
        return answer(&agent, request);
    }

    println!("{}", style("type \"exit\" to end the session").dim());
    loop {
        let message: String = input("Message:").placeholder("").interact()?;
        if message.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        // A failed request ends that turn, not the session
        if let Err(e) = answer(&agent, &message) {
            println!("{} {}", style("error:").red().bold(), e);
        }
    }
    Ok(())
}

fn answer(agent: &ToolAgent, request: &str) -> Result<()> {
    let spin = spinner();
    spin.start("awaiting reply");
    let result = agent.run(request);
    spin.stop("");

    render(&result?)?;
    println!("\n");
    Ok(())
}
