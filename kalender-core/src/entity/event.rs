//! Calendar events.

use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::cache::{CacheKey, Cacheable, EntityKind};
use crate::entity::{Category, Section, Structure, User};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub uid: Option<i64>,
    pub title: String,
    pub organizer: String,
    pub target_group: String,

    // Times are UTC. No start time means the event is all-day.
    pub start_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,

    pub zip: String,
    pub location: String,
    pub url: String,
    pub url_text: String,
    pub description: String,

    pub sections: Vec<Rc<Section>>,
    pub categories: Vec<Rc<Category>>,
    pub structure: Option<Rc<Structure>>,

    pub created_by: Option<Rc<User>>,
    pub created_at: Option<DateTime<Utc>>,
    pub changed_by: Option<Rc<User>>,
    pub changed_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        Event {
            title: title.into(),
            start_date,
            ..Default::default()
        }
    }

    pub fn is_all_day(&self) -> bool {
        self.start_time.is_none()
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start_date
            .and_time(self.start_time.unwrap_or_default())
    }

    pub fn has_end(&self) -> bool {
        self.end_date.is_some() || self.end_time.is_some()
    }

    /// End of the event; falls back to the start when no end is set.
    pub fn end(&self) -> NaiveDateTime {
        if !self.has_end() {
            return self.start();
        }
        self.end_date
            .unwrap_or(self.start_date)
            .and_time(self.end_time.unwrap_or_default())
    }

    /// Whoever touched the event last.
    pub fn author(&self) -> Option<&Rc<User>> {
        self.changed_by.as_ref().or(self.created_by.as_ref())
    }

    /// Add a section unless one with the same id is already attached.
    pub fn add_section(&mut self, section: Rc<Section>) {
        if section.id.is_some() && self.sections.iter().any(|s| s.id == section.id) {
            return;
        }
        self.sections.push(section);
    }

    /// Add a category. A category with the id of an attached one replaces
    /// it; custom categories are deduplicated by text.
    pub fn add_category(&mut self, category: Rc<Category>) {
        let existing = self.categories.iter().position(|c| match category.id {
            Some(id) => c.id == Some(id),
            None => c.is_custom() && c.text == category.text,
        });

        match existing {
            Some(pos) => self.categories[pos] = category,
            None => self.categories.push(category),
        }
    }

    /// Categories from the controlled vocabulary, id → text.
    pub fn keywords(&self) -> BTreeMap<i64, String> {
        self.categories
            .iter()
            .filter_map(|c| c.id.map(|id| (id, c.text.clone())))
            .collect()
    }

    pub fn custom_categories(&self) -> impl Iterator<Item = &Rc<Category>> {
        self.categories.iter().filter(|c| c.is_custom())
    }
}

impl Cacheable for Event {
    const KIND: EntityKind = EntityKind::Event;

    fn cache_key(&self) -> Option<CacheKey> {
        self.uid.map(CacheKey::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_event() -> Event {
        Event::new(
            "Sommerlager",
            NaiveDate::from_ymd_opt(2025, 7, 12).unwrap(),
        )
    }

    #[test]
    fn test_event_without_start_time_is_all_day() {
        let mut event = make_test_event();
        assert!(event.is_all_day());

        event.start_time = NaiveTime::from_hms_opt(10, 0, 0);
        assert!(!event.is_all_day());
    }

    #[test]
    fn test_end_defaults_to_start() {
        let mut event = make_test_event();
        event.start_time = NaiveTime::from_hms_opt(10, 30, 0);
        assert!(!event.has_end());
        assert_eq!(event.end(), event.start());

        event.end_date = NaiveDate::from_ymd_opt(2025, 7, 20);
        assert_eq!(
            event.end(),
            NaiveDate::from_ymd_opt(2025, 7, 20)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_author_prefers_changed_by() {
        let mut event = make_test_event();
        assert!(event.author().is_none());

        event.created_by = Some(Rc::new(User::new("creator")));
        assert_eq!(event.author().unwrap().username, "creator");

        event.changed_by = Some(Rc::new(User::new("editor")));
        assert_eq!(event.author().unwrap().username, "editor");
    }

    #[test]
    fn test_categories_split_into_keywords_and_custom() {
        let mut event = make_test_event();
        event.add_category(Rc::new(Category::new(1, "Lager")));
        event.add_category(Rc::new(Category::new(1, "Zeltlager")));
        event.add_category(Rc::new(Category::custom("Kanu")));
        event.add_category(Rc::new(Category::custom("Kanu")));

        assert_eq!(event.categories.len(), 2);
        assert_eq!(event.keywords(), BTreeMap::from([(1, "Zeltlager".to_string())]));
        let custom: Vec<&str> = event.custom_categories().map(|c| c.text.as_str()).collect();
        assert_eq!(custom, vec!["Kanu"]);
    }

    #[test]
    fn test_add_section_skips_duplicates() {
        let mut event = make_test_event();
        let section = Rc::new(Section {
            id: Some(2),
            ..Default::default()
        });
        event.add_section(Rc::clone(&section));
        event.add_section(section);
        assert_eq!(event.sections.len(), 1);
    }
}
