//! Conversion between wire records and entities.
//!
//! Decoding goes through the session's [`EntityCache`]: every decoded entity
//! that has an id is registered, and references to other entities are
//! resolved against what the cache already holds. Records must therefore
//! arrive dependencies first; unresolved references are left empty.

mod event;
mod index;
mod structure;

use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::cache::{Cacheable, EntityCache};
use crate::entity::{Category, Permission, PermissionState, User};
use crate::wire::{CategoryRecord, PermissionRecord, UserRecord};

/// Convert from a wire record, registering the result in `cache`.
pub trait FromWire: Cacheable + Sized {
    type Record;

    fn from_wire(record: Self::Record, cache: &mut EntityCache) -> Rc<Self>;
}

/// Convert to the wire record the service accepts.
pub trait ToWire {
    type Record;

    fn to_wire(&self) -> Self::Record;
}

fn register<T: Cacheable>(entity: T, cache: &mut EntityCache) -> Rc<T> {
    let entity = Rc::new(entity);
    cache.insert(Rc::clone(&entity));
    entity
}

/// Unix seconds to UTC; `0` means "not set".
fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

fn unix_secs(time: Option<DateTime<Utc>>) -> i64 {
    time.map(|t| t.timestamp()).unwrap_or(0)
}

impl FromWire for Category {
    type Record = CategoryRecord;

    fn from_wire(record: CategoryRecord, cache: &mut EntityCache) -> Rc<Self> {
        let category = Category {
            id: record.id,
            text: record.text,
        };
        register(category, cache)
    }
}

impl ToWire for Category {
    type Record = CategoryRecord;

    fn to_wire(&self) -> CategoryRecord {
        CategoryRecord {
            id: self.id,
            text: self.text.clone(),
        }
    }
}

impl FromWire for User {
    type Record = UserRecord;

    fn from_wire(record: UserRecord, cache: &mut EntityCache) -> Rc<Self> {
        let mut user = User::new(record.username);
        user.first_name = record.first_name;
        user.last_name = record.last_name;
        user.set_sex_code(&record.sex);
        register(user, cache)
    }
}

impl ToWire for User {
    type Record = UserRecord;

    fn to_wire(&self) -> UserRecord {
        UserRecord {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            sex: self.sex().map(|s| s.code().to_string()).unwrap_or_default(),
        }
    }
}

impl From<PermissionRecord> for Permission {
    fn from(record: PermissionRecord) -> Self {
        Permission {
            state: PermissionState::from_code(record.code),
            text: record.text,
            kind: record.kind,
        }
    }
}

impl From<&Permission> for PermissionRecord {
    fn from(permission: &Permission) -> Self {
        PermissionRecord {
            code: permission.state.code(),
            text: permission.text.clone(),
            kind: permission.kind.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Sex;

    #[test]
    fn test_user_from_wire_is_cached_by_username() {
        let mut cache = EntityCache::new();
        let record = UserRecord {
            username: "alice".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Adler".to_string(),
            sex: "w".to_string(),
        };
        let user = User::from_wire(record.clone(), &mut cache);

        assert_eq!(user.sex(), Some(Sex::Female));
        assert!(Rc::ptr_eq(&user, &cache.get::<User>("alice").unwrap()));
        assert_eq!(user.to_wire(), record);
    }

    #[test]
    fn test_user_with_unknown_sex_code() {
        let mut cache = EntityCache::new();
        let record = UserRecord {
            username: "bob".to_string(),
            sex: "x".to_string(),
            ..Default::default()
        };
        let user = User::from_wire(record, &mut cache);
        assert_eq!(user.sex(), None);
        assert_eq!(user.to_wire().sex, "");
    }

    #[test]
    fn test_custom_category_is_not_cached() {
        let mut cache = EntityCache::new();
        let category = Category::from_wire(
            CategoryRecord {
                id: None,
                text: "Kanu".to_string(),
            },
            &mut cache,
        );
        assert!(category.is_custom());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_permission_from_record() {
        let permission = Permission::from(PermissionRecord {
            code: 2,
            text: "requested".to_string(),
            kind: "event".to_string(),
        });
        assert_eq!(permission.state, PermissionState::RequestPending);
        assert!(permission.is_pending());
        assert_eq!(PermissionRecord::from(&permission).code, 2);

        let unknown = Permission::from(PermissionRecord {
            code: 9,
            ..Default::default()
        });
        assert_eq!(unknown.state, PermissionState::NoRight);
    }

    #[test]
    fn test_zero_timestamp_is_unset() {
        assert_eq!(timestamp(0), None);
        assert_eq!(unix_secs(timestamp(1_700_000_000)), 1_700_000_000);
        assert_eq!(unix_secs(None), 0);
    }
}
