use anyhow::Result;
use owo_colors::OwoColorize;

use crate::commands::{client, parse_filter};
use crate::render::render_index_tree;
use kalender_core::{Settings, index_roots};

pub fn run(settings: &Settings, scope: &[i64], filter: Option<&str>) -> Result<()> {
    let nodes = client(settings)?.index_tree(scope, parse_filter(filter)?)?;

    let roots = index_roots(&nodes);
    if roots.is_empty() {
        println!("{}", "No index entries found".dimmed());
        return Ok(());
    }

    let mut out = String::new();
    for root in &roots {
        render_index_tree(root, 0, &mut out);
    }
    print!("{}", out);
    Ok(())
}
