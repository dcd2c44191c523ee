use std::rc::Rc;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::trace;

use super::{FromWire, ToWire, register, timestamp, unix_secs};
use crate::cache::{CacheKey, Cacheable, EntityCache};
use crate::entity::{Category, Event, Section, Structure, User};
use crate::wire::{CategoryRecord, EventRecord};

impl FromWire for Event {
    type Record = EventRecord;

    fn from_wire(record: EventRecord, cache: &mut EntityCache) -> Rc<Self> {
        let uid = record.event_id();
        let start = DateTime::from_timestamp(record.start, 0)
            .unwrap_or_default()
            .naive_utc();
        let end = timestamp(record.end).map(|t| t.naive_utc());

        let mut event = Event {
            uid,
            title: record.title,
            organizer: record.organizer,
            target_group: record.target_group,
            start_date: start.date(),
            start_time: (!record.all_day).then(|| start.time()),
            end_date: end.map(|e| e.date()),
            end_time: end.filter(|_| !record.all_day).map(|e| e.time()),
            zip: record.zip,
            location: record.location,
            url: record.url,
            url_text: record.url_text,
            description: record.description,
            structure: record.structure.and_then(|id| lookup::<Structure>(cache, id)),
            created_by: record
                .created_by
                .and_then(|name| lookup::<User>(cache, name)),
            created_at: timestamp(record.created_at),
            changed_by: record
                .changed_by
                .and_then(|name| lookup::<User>(cache, name)),
            changed_at: timestamp(record.changed_at),
            ..Default::default()
        };

        for id in record.sections {
            if let Some(section) = lookup::<Section>(cache, id) {
                event.add_section(section);
            }
        }

        for (id, text) in record.keywords {
            let record = CategoryRecord { id: Some(id), text };
            event.add_category(Category::from_wire(record, cache));
        }
        for text in record.custom_keywords {
            event.add_category(Rc::new(Category::custom(text)));
        }

        register(event, cache)
    }
}

fn lookup<T: Cacheable>(cache: &EntityCache, id: impl Into<CacheKey>) -> Option<Rc<T>> {
    let id = id.into();
    let found = cache.get::<T>(id.clone());
    if found.is_none() {
        trace!(kind = ?T::KIND, %id, "unresolved reference");
    }
    found
}

fn unix_start(time: NaiveDateTime) -> i64 {
    time.and_utc().timestamp()
}

impl ToWire for Event {
    type Record = EventRecord;

    fn to_wire(&self) -> EventRecord {
        EventRecord {
            id: self.uid,
            uid: None,
            title: self.title.clone(),
            organizer: self.organizer.clone(),
            target_group: self.target_group.clone(),
            start: unix_start(self.start()),
            end: if self.has_end() {
                unix_start(self.end())
            } else {
                0
            },
            all_day: self.is_all_day(),
            zip: self.zip.clone(),
            location: self.location.clone(),
            url_text: self.url_text.clone(),
            url: self.url.clone(),
            description: self.description.clone(),
            sections: self.sections.iter().filter_map(|s| s.id).collect(),
            keywords: self.keywords(),
            custom_keywords: self.custom_categories().map(|c| c.text.clone()).collect(),
            structure: self.structure.as_ref().and_then(|s| s.id),
            changed_by: self.changed_by.as_ref().map(|u| u.username.clone()),
            changed_at: unix_secs(self.changed_at),
            created_by: self.created_by.as_ref().map(|u| u.username.clone()),
            created_at: self.created_at.unwrap_or_else(Utc::now).timestamp(),
        }
    }
}
