//! CLI fact commands — `memorize`, `facts`, `retrieve`, `clear-facts`.

use anyhow::Result;

use shellmind::config::ShellmindConfig;
use shellmind::memory::types::FilterMode;

use super::open_memory;

pub fn memorize(config: &ShellmindConfig, fact: &str) -> Result<()> {
    open_memory(config)?.memorize_fact(fact)?;
    Ok(())
}

pub fn list(config: &ShellmindConfig) -> Result<()> {
    print!("{}", open_memory(config)?.list_facts()?);
    Ok(())
}

/// Print the facts relevant to `query`, phrased as a question for ranking.
pub fn retrieve(config: &ShellmindConfig, query: &str, passthrough: bool) -> Result<()> {
    let memory = open_memory(config)?;
    let mode = if passthrough {
        FilterMode::Passthrough
    } else {
        config
            .relevance
            .mode
            .parse::<FilterMode>()
            .map_err(anyhow::Error::msg)?
    };

    let question = format!("What is {query}?");
    match memory.retrieve_fact(&question, mode, config.relevance.api_key.as_deref())? {
        Some(facts) => print!("{facts}"),
        None => println!("No facts have been memorized yet."),
    }
    Ok(())
}

pub fn clear(config: &ShellmindConfig) -> Result<()> {
    open_memory(config)?.clear_facts()?;
    Ok(())
}
