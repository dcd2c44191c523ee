use std::rc::Rc;

use tracing::trace;

use super::{FromWire, ToWire, register};
use crate::cache::EntityCache;
use crate::entity::Index;
use crate::wire::IndexRecord;

impl FromWire for Index {
    type Record = IndexRecord;

    /// Links the node under its parent when the parent is already cached.
    /// Parents must be decoded before their children.
    fn from_wire(record: IndexRecord, cache: &mut EntityCache) -> Rc<Self> {
        let parent = record
            .parent_id
            .filter(|parent_id| Some(*parent_id) != record.id)
            .and_then(|parent_id| cache.get::<Index>(parent_id));

        // Children stay private to the entity, so fill a default node.
        let mut node = Index::default();
        node.id = record.id;
        node.number = record.number;
        node.level = record.level;
        node.name = record.name;
        node.locality = record.locality;
        node.postal_code = record.postal_code;
        node.url = record.url;
        node.latitude = record.latitude;
        node.longitude = record.longitude;
        node.parent_id = record.parent_id;
        let node = register(node, cache);

        match parent {
            Some(parent) => parent.add_child(Rc::clone(&node)),
            None if !node.is_root() => {
                trace!(id = ?node.id, parent_id = ?node.parent_id, "parent not seen yet");
            }
            None => {}
        }
        node
    }
}

impl ToWire for Index {
    type Record = IndexRecord;

    fn to_wire(&self) -> IndexRecord {
        IndexRecord {
            id: self.id,
            number: self.number.clone(),
            level: self.level.clone(),
            name: self.name.clone(),
            locality: self.locality.clone(),
            postal_code: self.postal_code.clone(),
            url: self.url.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            parent_id: self.parent_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_record(id: i64, parent_id: Option<i64>) -> IndexRecord {
        IndexRecord {
            id: Some(id),
            name: format!("Node {}", id),
            parent_id,
            ..Default::default()
        }
    }

    #[test]
    fn test_parent_before_child_links() {
        let mut cache = EntityCache::new();
        let root = Index::from_wire(make_test_record(1, None), &mut cache);
        let child = Index::from_wire(make_test_record(2, Some(1)), &mut cache);

        let children = root.children();
        assert_eq!(children.len(), 1);
        assert!(Rc::ptr_eq(&children[0], &child));
        assert!(root.is_root());
        assert!(!child.is_root());
    }

    #[test]
    fn test_child_before_parent_stays_unlinked() {
        let mut cache = EntityCache::new();
        Index::from_wire(make_test_record(2, Some(1)), &mut cache);
        let root = Index::from_wire(make_test_record(1, None), &mut cache);

        assert!(root.children().is_empty());
        assert_eq!(cache.values::<Index>().len(), 2);
    }

    #[test]
    fn test_self_parent_is_not_linked() {
        let mut cache = EntityCache::new();
        Index::from_wire(make_test_record(5, None), &mut cache);
        let node = Index::from_wire(make_test_record(5, Some(5)), &mut cache);
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_index_round_trip() {
        let mut cache = EntityCache::new();
        let record = IndexRecord {
            latitude: Some(50.1),
            longitude: Some(8.6),
            locality: "Frankfurt".to_string(),
            postal_code: "60311".to_string(),
            ..make_test_record(3, Some(1))
        };
        let node = Index::from_wire(record.clone(), &mut cache);
        assert_eq!(node.to_wire(), record);
    }
}
