//! Identity map for one mapping session.
//!
//! Holds the canonical `Rc` of every entity seen while mapping a response so
//! that later records can reference earlier ones by id. There is no eviction:
//! create one cache per request and drop it afterwards.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Event,
    Structure,
    Section,
    Category,
    User,
    Index,
}

/// Id of a cached entity: numeric for most kinds, the username for users.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Number(i64),
    Name(String),
}

impl From<i64> for CacheKey {
    fn from(id: i64) -> Self {
        CacheKey::Number(id)
    }
}

impl From<&str> for CacheKey {
    fn from(name: &str) -> Self {
        CacheKey::Name(name.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(name: String) -> Self {
        CacheKey::Name(name)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CacheKey::Number(n) => write!(f, "{}", n),
            CacheKey::Name(name) => write!(f, "{}", name),
        }
    }
}

/// An entity that can live in the [`EntityCache`].
pub trait Cacheable: Any {
    const KIND: EntityKind;

    /// `None` when the entity has not been persisted yet.
    fn cache_key(&self) -> Option<CacheKey>;
}

#[derive(Default)]
pub struct EntityCache {
    entries: HashMap<(EntityKind, CacheKey), Rc<dyn Any>>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entity`, replacing any entry with the same kind and id.
    ///
    /// Returns `None` (and stores nothing) when the entity has no id.
    pub fn add<T: Cacheable>(&mut self, entity: T) -> Option<Rc<T>> {
        let entity = Rc::new(entity);
        self.insert(Rc::clone(&entity)).then_some(entity)
    }

    /// Store an already shared entity. Returns whether it was stored.
    pub fn insert<T: Cacheable>(&mut self, entity: Rc<T>) -> bool {
        let Some(key) = entity.cache_key() else {
            trace!(kind = ?T::KIND, "not caching entity without id");
            return false;
        };
        self.entries.insert((T::KIND, key), entity);
        true
    }

    pub fn get<T: Cacheable>(&self, id: impl Into<CacheKey>) -> Option<Rc<T>> {
        let entry = self.entries.get(&(T::KIND, id.into()))?;
        Rc::clone(entry).downcast::<T>().ok()
    }

    pub fn contains<T: Cacheable>(&self, id: impl Into<CacheKey>) -> bool {
        self.entries.contains_key(&(T::KIND, id.into()))
    }

    /// All cached entities of one kind, in no particular order.
    pub fn values<T: Cacheable>(&self) -> Vec<Rc<T>> {
        self.entries
            .iter()
            .filter(|((kind, _), _)| *kind == T::KIND)
            .filter_map(|(_, entry)| Rc::clone(entry).downcast::<T>().ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for EntityCache {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EntityCache")
            .field("len", &self.entries.len())
            .finish()
    }
}
