//! Organizational units ("Kalender") that own events.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::cache::{CacheKey, Cacheable, EntityKind};
use crate::entity::Category;

/// Structures at or above this level rank include their name in
/// [`Structure::long_name`].
pub const LONG_NAME_MIN_LEVEL_RANK: i32 = 7;

pub type CategoryMap = BTreeMap<i64, Rc<Category>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    pub id: Option<i64>,
    /// Level label, e.g. "Stamm" or "Bezirk".
    pub level: String,
    pub name: String,
    pub federation: String,
    pub ident: String,
    pub level_rank: i32,
    pub used_categories: CategoryMap,
    /// Categories every event of this structure must choose from, per slot.
    pub forced_categories: BTreeMap<String, CategoryMap>,
}

impl Structure {
    pub fn long_name(&self) -> String {
        if self.level_rank >= LONG_NAME_MIN_LEVEL_RANK {
            format!("{} {}", self.level, self.name)
        } else {
            self.level.clone()
        }
    }
}

impl Cacheable for Structure {
    const KIND: EntityKind = EntityKind::Structure;

    fn cache_key(&self) -> Option<CacheKey> {
        self.id.map(CacheKey::Number)
    }
}
