use anyhow::Result;
use owo_colors::OwoColorize;

use crate::commands::client;
use crate::render::Render;
use kalender_core::Settings;

pub fn run(settings: &Settings, scope: &[i64]) -> Result<()> {
    let structures = client(settings)?.structures(scope)?;

    if structures.is_empty() {
        println!("{}", "No calendars found".dimmed());
        return Ok(());
    }

    for structure in &structures {
        println!("{}", structure.render());
    }
    Ok(())
}
