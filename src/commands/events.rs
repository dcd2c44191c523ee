use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::commands::{client, parse_filter};
use crate::render::Render;
use kalender_core::Settings;

pub fn run(settings: &Settings, scope: &[i64], filter: Option<&str>) -> Result<()> {
    let client = client(settings)?;
    let mut events = client.events(scope, parse_filter(filter)?)?;

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    events.sort_by_key(|event| event.start());

    // Group events by day
    let mut current_date: Option<NaiveDate> = None;
    for event in &events {
        let date = event.start_date;
        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", format_date_label(date).bold());
            current_date = Some(date);
        }
        println!("{}", event.render());
    }

    Ok(())
}

/// "Today", "Tomorrow" or e.g. "Wed Feb 25"
fn format_date_label(date: NaiveDate) -> String {
    let today = chrono::Utc::now().date_naive();
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    }
}
