//! Colored terminal rendering for kalender-core types.

use std::rc::Rc;

use kalender_core::{Event, Index, Permission, PermissionState, Structure};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = if self.is_all_day() {
            "all-day".to_string()
        } else {
            format!("{:>7}", self.start().format("%H:%M"))
        };

        let mut line = format!("  {} {}", time, self.title);
        if let Some(structure) = &self.structure {
            line.push_str(&format!(" {}", format!("[{}]", structure.long_name()).dimmed()));
        }
        if !self.location.is_empty() {
            line.push_str(&format!(" @ {}", self.location.cyan()));
        }
        if self.has_end() && self.end().date() != self.start().date() {
            line.push_str(&format!(
                " {}",
                format!("until {}", self.end().format("%a %b %-d")).dimmed()
            ));
        }
        line
    }
}

impl Render for Structure {
    fn render(&self) -> String {
        let id = self.id.map(|id| id.to_string()).unwrap_or_default();
        let mut out = format!("{} {}", self.long_name().bold(), format!("#{}", id).dimmed());
        if !self.federation.is_empty() {
            out.push_str(&format!(" ({})", self.federation));
        }

        if !self.used_categories.is_empty() {
            let names: Vec<&str> = self
                .used_categories
                .values()
                .map(|c| c.text.as_str())
                .collect();
            out.push_str(&format!("\n  Categories: {}", names.join(", ")));
        }
        for (slot, categories) in &self.forced_categories {
            let names: Vec<&str> = categories.values().map(|c| c.text.as_str()).collect();
            out.push_str(&format!("\n  {} {}: {}", "Required".yellow(), slot, names.join(", ")));
        }
        out
    }
}

impl Render for Permission {
    fn render(&self) -> String {
        let state = match self.state {
            PermissionState::WriteAllowed => "write allowed".green().to_string(),
            PermissionState::NoRight => "no write permission".red().to_string(),
            PermissionState::RequestPending => "request pending".yellow().to_string(),
        };
        if self.text.is_empty() {
            state
        } else {
            format!("{} {}", state, format!("({})", self.text).dimmed())
        }
    }
}

/// Render an index node and its descendants as an indented tree.
pub fn render_index_tree(node: &Rc<Index>, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let label = if node.level.is_empty() {
        node.name.clone()
    } else {
        format!("{} {}", node.level, node.name)
    };
    out.push_str(&format!("{}{}", indent, label));
    if !node.locality.is_empty() {
        let place = format!("({} {})", node.postal_code, node.locality);
        out.push_str(&format!(" {}", place.dimmed()));
    }
    out.push('\n');

    let mut children = node.children();
    children.sort_by(|a, b| a.name.cmp(&b.name));
    for child in &children {
        render_index_tree(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn make_test_event() -> Event {
        let start = NaiveDate::from_ymd_opt(2025, 7, 12).unwrap();
        let mut event = Event::new("Sommerlager", start);
        event.start_time = NaiveTime::from_hms_opt(10, 0, 0);
        event.location = "Zeltplatz".to_string();
        event
    }

    #[test]
    fn test_render_event_contains_title_and_time() {
        let rendered = make_test_event().render();
        assert!(rendered.contains("Sommerlager"));
        assert!(rendered.contains("10:00"));
        assert!(rendered.contains("Zeltplatz"));
    }

    #[test]
    fn test_render_index_tree_indents_children() {
        let mut root = Index::default();
        root.id = Some(1);
        root.name = "Bund".to_string();
        let root = Rc::new(root);

        let mut child = Index::default();
        child.id = Some(2);
        child.name = "Bezirk".to_string();
        child.parent_id = Some(1);
        let child = Rc::new(child);
        root.add_child(child);

        let mut out = String::new();
        render_index_tree(&root, 0, &mut out);
        assert_eq!(out, "Bund\n  Bezirk\n");
    }
}
