//! High-level client for the calendar service.
//!
//! Reads are batched: one call returns a flat list of tagged records which is
//! folded through a fresh [`EntityCache`], so later records resolve against
//! earlier ones in the same response. Writes carry an auth token generated
//! from the caller's api key.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Value, json};
use tracing::{debug, trace};

use crate::auth::{self, json::to_canonical_string};
use crate::cache::EntityCache;
use crate::entity::{Event, Index, Permission, Section, Structure, User};
use crate::error::{KalenderResult, TransportError};
use crate::mapper::{FromWire, ToWire};
use crate::transport::Transport;
use crate::wire::{PermissionRecord, RecordKind, TaggedRecord, UNSET_ID};

const EVENT_TYPE: &str = "event";

pub struct KalenderClient<T: Transport> {
    transport: T,
}

impl<T: Transport> KalenderClient<T> {
    pub fn new(transport: T) -> Self {
        KalenderClient { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Events visible in the given structures, in response order.
    pub fn events(&self, scope_ids: &[i64], filter: Value) -> KalenderResult<Vec<Rc<Event>>> {
        let mut cache = EntityCache::new();
        let mut events = Vec::new();

        for record in self.fetch(scope_ids, "events", filter)? {
            match record.kind() {
                RecordKind::User => {
                    User::from_wire(record.decode()?, &mut cache);
                }
                RecordKind::Section => {
                    Section::from_wire(record.decode()?, &mut cache);
                }
                RecordKind::Structure => {
                    Structure::from_wire(record.decode()?, &mut cache);
                }
                RecordKind::Event => {
                    events.push(Event::from_wire(record.decode()?, &mut cache));
                }
                RecordKind::Index | RecordKind::Unknown => {
                    trace!(tag = %record.tag, "skipping record");
                }
            }
        }

        debug!(count = events.len(), "mapped events");
        Ok(events)
    }

    /// All index nodes keyed by id, linked parent to child.
    ///
    /// Roots are the nodes without a parent, see
    /// [`index_roots`](crate::entity::index_roots).
    pub fn index_tree(
        &self,
        scope_ids: &[i64],
        filter: Value,
    ) -> KalenderResult<HashMap<i64, Rc<Index>>> {
        let mut cache = EntityCache::new();
        let mut nodes = HashMap::new();

        for record in self.fetch(scope_ids, "index", filter)? {
            if record.kind() != RecordKind::Index {
                trace!(tag = %record.tag, "skipping record");
                continue;
            }
            let node = Index::from_wire(record.decode()?, &mut cache);
            if let Some(id) = node.id {
                nodes.insert(id, node);
            }
        }

        debug!(count = nodes.len(), "mapped index nodes");
        Ok(nodes)
    }

    pub fn structures(&self, scope_ids: &[i64]) -> KalenderResult<Vec<Rc<Structure>>> {
        let mut cache = EntityCache::new();
        let mut structures = Vec::new();

        for record in self.fetch(scope_ids, "kalender", json!({}))? {
            if record.kind() != RecordKind::Structure {
                trace!(tag = %record.tag, "skipping record");
                continue;
            }
            structures.push(Structure::from_wire(record.decode()?, &mut cache));
        }

        debug!(count = structures.len(), "mapped structures");
        Ok(structures)
    }

    /// Create or update an event. Returns whatever the service answers.
    pub fn write_event(
        &self,
        event: &Event,
        username: &str,
        api_key: &str,
    ) -> KalenderResult<Value> {
        let record = serde_json::to_value(event.to_wire())?;
        let id = event.uid.unwrap_or(UNSET_ID);

        let check = format!("{EVENT_TYPE}{id}{}{username}", to_canonical_string(&record));
        let token = auth::generate(api_key, &check)?;

        self.call("setData", json!([EVENT_TYPE, id, record, username, token]))
    }

    pub fn delete_event(
        &self,
        structure_id: i64,
        event_id: i64,
        username: &str,
        api_key: &str,
    ) -> KalenderResult<Value> {
        let check = format!("{EVENT_TYPE}{structure_id}{event_id}{username}");
        let token = auth::generate(api_key, &check)?;

        self.call(
            "deleteObject",
            json!([EVENT_TYPE, structure_id, event_id, username, token]),
        )
    }

    pub fn check_write_permission(
        &self,
        structure_id: i64,
        username: &str,
        api_key: &str,
    ) -> KalenderResult<Permission> {
        self.permission_call("checkPermission", structure_id, username, api_key)
    }

    pub fn request_write_permission(
        &self,
        structure_id: i64,
        username: &str,
        api_key: &str,
    ) -> KalenderResult<Permission> {
        self.permission_call("requestPermission", structure_id, username, api_key)
    }

    fn permission_call(
        &self,
        method: &str,
        structure_id: i64,
        username: &str,
        api_key: &str,
    ) -> KalenderResult<Permission> {
        let check = format!("{EVENT_TYPE}{structure_id}{username}");
        let token = auth::generate(api_key, &check)?;

        let result = self.call(method, json!([EVENT_TYPE, structure_id, username, token]))?;
        if !result.is_object() {
            return Err(TransportError::MalformedResponse(format!(
                "expected permission object, got {result}"
            ))
            .into());
        }
        let record: PermissionRecord = serde_json::from_value(result)?;
        Ok(Permission::from(record))
    }

    fn call(&self, method: &str, params: Value) -> KalenderResult<Value> {
        debug!(method, "calling service");
        Ok(self.transport.call(method, params)?)
    }

    fn fetch(
        &self,
        scope_ids: &[i64],
        key: &str,
        filter: Value,
    ) -> KalenderResult<Vec<TaggedRecord>> {
        let mut query = serde_json::Map::new();
        query.insert(key.to_string(), filter);

        let result = self.call("get_data_by_global_id", json!([scope_ids, query]))?;
        let items = match result {
            Value::Array(items) => items,
            Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            Value::Null => Vec::new(),
            other => {
                return Err(TransportError::MalformedResponse(format!(
                    "expected a list of records, got {other}"
                ))
                .into());
            }
        };

        let records: Vec<TaggedRecord> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    trace!(error = %e, "skipping untagged record");
                    None
                }
            })
            .collect();
        debug!(key, count = records.len(), "fetched records");
        Ok(records)
    }
}
