//! Keywords ("Kategorien") attached to events, sections and structures.

use crate::cache::{CacheKey, Cacheable, EntityKind};

/// A labeled tag. Categories without an id are ad-hoc custom keywords that
/// are not part of the controlled vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    pub id: Option<i64>,
    pub text: String,
}

impl Category {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Category {
            id: Some(id),
            text: text.into(),
        }
    }

    pub fn custom(text: impl Into<String>) -> Self {
        Category {
            id: None,
            text: text.into(),
        }
    }

    pub fn is_custom(&self) -> bool {
        self.id.is_none()
    }
}

impl Cacheable for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn cache_key(&self) -> Option<CacheKey> {
        self.id.map(CacheKey::Number)
    }
}
