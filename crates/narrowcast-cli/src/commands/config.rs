use anyhow::Result;

use narrowcast_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Config file already exists: {}", path.display());
        } else {
            config.save()?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    let status = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("Config file: {}{}\n", path.display(), status);
    println!("{}", toml::to_string_pretty(config)?);

    Ok(())
}
