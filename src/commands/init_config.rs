use anyhow::Result;
use owo_colors::OwoColorize;

use kalender_core::Settings;

pub fn run(force: bool) -> Result<()> {
    let path = Settings::config_path()?;

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }

    Settings::create_default_config(&path)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}
