use std::path::Path;

use eyre::Result;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub async fn handle_config_command(cmd: ConfigCommands, path: &Path) -> Result<()> {
    let mut config = Config::load(path).await?;

    match cmd {
        ConfigCommands::Set { key, value } => {
            config.set_value(&key, &value)?;
            config.save(path).await?;
            println!("✅ Configuration updated: {} = {}", key, value);
        }
        ConfigCommands::Get { key } => {
            println!("{}: {}", key, config.get_value(&key)?);
        }
        ConfigCommands::Show => {
            println!("{}", config.show_all());
        }
    }

    Ok(())
}
