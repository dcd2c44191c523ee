//! Domain entities.
//!
//! Entities reference each other through shared `Rc`s handed out by the
//! [`EntityCache`](crate::cache::EntityCache) of the session that mapped them.

mod category;
mod event;
mod index;
mod permission;
mod section;
mod structure;
mod user;

pub use category::Category;
pub use event::Event;
pub use index::{Index, index_roots, link_index_tree};
pub use permission::{Permission, PermissionState};
pub use section::{SECTION_IMAGE_BASE_URL, Section};
pub use structure::{CategoryMap, LONG_NAME_MIN_LEVEL_RANK, Structure};
pub use user::{Sex, User};
