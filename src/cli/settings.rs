//! CLI `config` commands — read and write individual config keys.

use anyhow::Result;

use shellmind::config::{self, ShellmindConfig};

pub fn get(config: &ShellmindConfig, key: &str) -> Result<()> {
    match config.get(key)? {
        Some(value) => println!("{value}"),
        None => println!("{key} is not set"),
    }
    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let path = config::default_config_path();
    config::set_value(&path, key, value)?;
    println!("{key} updated in {}", path.display());
    Ok(())
}

pub fn path() {
    println!("{}", config::default_config_path().display());
}
