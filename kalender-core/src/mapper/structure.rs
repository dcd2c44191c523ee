use std::rc::Rc;

use super::{FromWire, ToWire, register};
use crate::cache::EntityCache;
use crate::entity::{Category, CategoryMap, Section, Structure};
use crate::wire::{CategoryRecord, KeywordMap, SectionRecord, StructureRecord};

fn categories_from_wire(keywords: KeywordMap, cache: &mut EntityCache) -> CategoryMap {
    keywords
        .into_iter()
        .map(|(id, text)| {
            let record = CategoryRecord { id: Some(id), text };
            (id, Category::from_wire(record, cache))
        })
        .collect()
}

fn categories_to_wire(categories: &CategoryMap) -> KeywordMap {
    categories
        .iter()
        .map(|(id, category)| (*id, category.text.clone()))
        .collect()
}

impl FromWire for Structure {
    type Record = StructureRecord;

    fn from_wire(record: StructureRecord, cache: &mut EntityCache) -> Rc<Self> {
        let used_categories = categories_from_wire(record.used_categories, cache);
        let forced_categories = record
            .forced_categories
            .into_iter()
            .map(|(slot, keywords)| (slot, categories_from_wire(keywords, cache)))
            .collect();

        let structure = Structure {
            id: record.id,
            level: record.level,
            name: record.name,
            federation: record.federation,
            ident: record.ident,
            level_rank: record.level_rank,
            used_categories,
            forced_categories,
        };
        register(structure, cache)
    }
}

impl ToWire for Structure {
    type Record = StructureRecord;

    fn to_wire(&self) -> StructureRecord {
        StructureRecord {
            id: self.id,
            level: self.level.clone(),
            name: self.name.clone(),
            federation: self.federation.clone(),
            ident: self.ident.clone(),
            level_rank: self.level_rank,
            used_categories: categories_to_wire(&self.used_categories),
            forced_categories: self
                .forced_categories
                .iter()
                .map(|(slot, categories)| (slot.clone(), categories_to_wire(categories)))
                .collect(),
        }
    }
}

impl FromWire for Section {
    type Record = SectionRecord;

    fn from_wire(record: SectionRecord, cache: &mut EntityCache) -> Rc<Self> {
        let section = Section {
            id: record.id,
            federation: record.federation,
            name: record.name,
            color: record.color,
            start_age: record.start_age,
            end_age: record.end_age,
            category: record.category.and_then(|id| cache.get::<Category>(id)),
        };
        register(section, cache)
    }
}

impl ToWire for Section {
    type Record = SectionRecord;

    fn to_wire(&self) -> SectionRecord {
        SectionRecord {
            id: self.id,
            federation: self.federation.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
            start_age: self.start_age,
            end_age: self.end_age,
            category: self.category.as_ref().and_then(|c| c.id),
        }
    }
}
