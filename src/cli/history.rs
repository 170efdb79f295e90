//! CLI history commands — `init`, `remember`, `recall`, `history`.

use anyhow::{Context, Result};

use shellmind::config::ShellmindConfig;
use shellmind::memory::types::RecallKey;

use super::open_memory;

pub fn init(config: &ShellmindConfig) -> Result<()> {
    let memory = open_memory(config)?;
    memory.init()?;
    println!("History ready at {}", memory.interactions().path().display());
    Ok(())
}

pub fn remember(
    config: &ShellmindConfig,
    input: &str,
    output: &str,
    name: Option<&str>,
    favorite: bool,
) -> Result<()> {
    let memory = open_memory(config)?;
    memory
        .remember(input, output, name, favorite)
        .context("failed to save interaction (run `shellmind init` first?)")?;
    Ok(())
}

/// Print the output of a past interaction. An index past the end is not an error.
pub fn recall(config: &ShellmindConfig, token: &str) -> Result<()> {
    let memory = open_memory(config)?;
    let key = RecallKey::parse(token)?;
    match memory.recall(key) {
        Ok(record) => println!("{}", record.output),
        Err(e) if e.is_not_found() => println!("Index is out of range"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub fn history(config: &ShellmindConfig) -> Result<()> {
    let memory = open_memory(config)?;
    let records = memory.history()?;

    if records.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    for entry in records {
        let star = if entry.record.favorite { "*" } else { " " };
        println!(
            "{:>4}{} [{}] {}",
            entry.index, star, entry.record.name, entry.record.input
        );
        println!("       {}", entry.record.output);
    }
    Ok(())
}
