//! Geographic/administrative hierarchy nodes.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::debug;

use crate::cache::{CacheKey, Cacheable, EntityKind};

/// A node of the index tree.
///
/// Children are owned by their parent; nodes refer to their parent only by
/// id. Neither linker creates a child that is also an ancestor, so the tree
/// never forms reference cycles.
#[derive(Debug, Clone, Default)]
pub struct Index {
    pub id: Option<i64>,
    pub number: String,
    pub level: String,
    pub name: String,
    pub locality: String,
    pub postal_code: String,
    pub url: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub parent_id: Option<i64>,
    children: RefCell<Vec<Rc<Index>>>,
}

impl Index {
    pub fn children(&self) -> Vec<Rc<Index>> {
        self.children.borrow().clone()
    }

    pub fn add_child(&self, child: Rc<Index>) {
        self.children.borrow_mut().push(child);
    }

    pub fn has_child(&self, child: &Rc<Index>) -> bool {
        self.children.borrow().iter().any(|c| Rc::ptr_eq(c, child))
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Cacheable for Index {
    const KIND: EntityKind = EntityKind::Index;

    fn cache_key(&self) -> Option<CacheKey> {
        self.id.map(CacheKey::Number)
    }
}

/// Nodes without a parent id, sorted by id.
pub fn index_roots(nodes: &HashMap<i64, Rc<Index>>) -> Vec<Rc<Index>> {
    let mut roots: Vec<Rc<Index>> = nodes.values().filter(|n| n.is_root()).cloned().collect();
    roots.sort_by_key(|n| n.id);
    roots
}

/// Link every node to its parent regardless of the order the nodes arrived
/// in. Links that already exist are kept as they are.
///
/// Nodes whose `parent_id` chain leads back to themselves are left unlinked.
pub fn link_index_tree(nodes: &HashMap<i64, Rc<Index>>) {
    let mut ordered: Vec<&Rc<Index>> = nodes.values().collect();
    ordered.sort_by_key(|n| n.id);

    for node in ordered {
        let Some(parent) = node.parent_id.and_then(|id| nodes.get(&id)) else {
            continue;
        };
        if parent.has_child(node) {
            continue;
        }
        if is_ancestor_or_self(nodes, node, parent) {
            debug!(id = ?node.id, parent_id = ?node.parent_id, "skipping cyclic index link");
            continue;
        }
        parent.add_child(Rc::clone(node));
    }
}

/// Whether `node` is `start` or one of its ancestors by `parent_id`.
fn is_ancestor_or_self(
    nodes: &HashMap<i64, Rc<Index>>,
    node: &Rc<Index>,
    start: &Rc<Index>,
) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(start);

    while let Some(candidate) = current {
        if Rc::ptr_eq(candidate, node) {
            return true;
        }
        let Some(id) = candidate.id else {
            return false;
        };
        if !seen.insert(id) {
            return false;
        }
        current = candidate.parent_id.and_then(|parent_id| nodes.get(&parent_id));
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_node(id: i64, parent_id: Option<i64>) -> Rc<Index> {
        Rc::new(Index {
            id: Some(id),
            parent_id,
            name: format!("node {}", id),
            ..Default::default()
        })
    }

    #[test]
    fn test_link_index_tree_ignores_input_order() {
        let nodes: HashMap<i64, Rc<Index>> = [
            make_test_node(3, Some(2)),
            make_test_node(2, Some(1)),
            make_test_node(1, None),
            make_test_node(4, Some(1)),
        ]
        .into_iter()
        .map(|n| (n.id.unwrap(), n))
        .collect();

        link_index_tree(&nodes);

        let child_ids = |id: i64| -> Vec<Option<i64>> {
            nodes[&id].children().iter().map(|c| c.id).collect()
        };
        assert_eq!(child_ids(1), vec![Some(2), Some(4)]);
        assert_eq!(child_ids(2), vec![Some(3)]);
        assert!(child_ids(3).is_empty());

        let roots = index_roots(&nodes);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, Some(1));
    }

    #[test]
    fn test_link_index_tree_does_not_duplicate_links() {
        let parent = make_test_node(1, None);
        let child = make_test_node(2, Some(1));
        parent.add_child(Rc::clone(&child));

        let nodes: HashMap<i64, Rc<Index>> = [(1, parent), (2, child)].into_iter().collect();
        link_index_tree(&nodes);

        assert_eq!(nodes[&1].children().len(), 1);
    }

    #[test]
    fn test_self_parent_is_not_linked() {
        let node = make_test_node(5, Some(5));
        let nodes: HashMap<i64, Rc<Index>> = [(5, node)].into_iter().collect();
        link_index_tree(&nodes);
        assert!(nodes[&5].children().is_empty());
    }

    #[test]
    fn test_cyclic_parents_are_not_linked() {
        let nodes: HashMap<i64, Rc<Index>> = [
            make_test_node(1, Some(2)),
            make_test_node(2, Some(1)),
            make_test_node(3, Some(1)),
        ]
        .into_iter()
        .map(|n| (n.id.unwrap(), n))
        .collect();

        link_index_tree(&nodes);

        assert!(nodes[&2].children().is_empty());
        assert_eq!(nodes[&1].children().len(), 1);
        assert_eq!(nodes[&1].children()[0].id, Some(3));

        let weak = Rc::downgrade(&nodes[&1]);
        drop(nodes);
        assert!(weak.upgrade().is_none(), "cyclic nodes leaked");
    }

    #[test]
    fn test_longer_cycle_is_not_linked() {
        let nodes: HashMap<i64, Rc<Index>> = [
            make_test_node(1, Some(3)),
            make_test_node(2, Some(1)),
            make_test_node(3, Some(2)),
        ]
        .into_iter()
        .map(|n| (n.id.unwrap(), n))
        .collect();

        link_index_tree(&nodes);

        let weak: Vec<_> = nodes.values().map(Rc::downgrade).collect();
        drop(nodes);
        assert!(weak.iter().all(|w| w.upgrade().is_none()));
    }
}
