pub mod facts;
pub mod history;
pub mod settings;

use anyhow::Result;

use shellmind::config::ShellmindConfig;
use shellmind::memory::Memory;

fn open_memory(config: &ShellmindConfig) -> Result<Memory> {
    Memory::from_config(config)
}
