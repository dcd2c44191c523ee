//! Age-graded sub-groups ("Stufen").

use std::rc::Rc;

use crate::cache::{CacheKey, Cacheable, EntityKind};
use crate::entity::Category;

/// Where the per-section badge images are served from.
pub const SECTION_IMAGE_BASE_URL: &str = "https://kalender.scoutnet.de/2.0/images/";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub id: Option<i64>,
    pub federation: String,
    pub name: String,
    pub color: String,
    pub start_age: i32,
    pub end_age: i32,
    pub category: Option<Rc<Category>>,
}

impl Section {
    /// Badge image for this section. Keyed by the section's own id, not by
    /// its category's.
    pub fn image_url(&self) -> Option<String> {
        self.id
            .map(|id| format!("{}{}.gif", SECTION_IMAGE_BASE_URL, id))
    }
}

impl Cacheable for Section {
    const KIND: EntityKind = EntityKind::Section;

    fn cache_key(&self) -> Option<CacheKey> {
        self.id.map(CacheKey::Number)
    }
}
