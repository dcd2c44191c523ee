use anyhow::Result;

use crate::commands::client;
use crate::render::Render;
use kalender_core::Settings;

pub fn run(settings: &Settings, calendar: i64, user: Option<&str>, request: bool) -> Result<()> {
    let username = match user {
        Some(user) => user,
        None => settings.api_user()?,
    };
    let api_key = settings.api_key()?;
    let client = client(settings)?;

    let permission = if request {
        client.request_write_permission(calendar, username, api_key)?
    } else {
        client.check_write_permission(calendar, username, api_key)?
    };

    println!("{} on calendar {}: {}", username, calendar, permission.render());
    Ok(())
}
