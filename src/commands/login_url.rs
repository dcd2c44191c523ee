use anyhow::Result;

use kalender_core::Settings;

pub fn run(settings: &Settings, redirect: Option<&str>) -> Result<()> {
    println!("{}", settings.auth.login_link(redirect)?);
    Ok(())
}
