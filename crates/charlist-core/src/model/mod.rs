//! Entity model for the character aggregate
//!
//! Identity and value are separate types: store-assigned ids are typed
//! newtypes, catalog entities compare by id only, and a tag that has not
//! been persisted yet is a [`TagDraft`] that can never compare equal to a
//! stored [`Tag`].

mod backup;
mod character;
mod color;
mod ids;
mod package;
mod tag;

pub use backup::Backup;
pub use character::Character;
pub use color::Color;
pub use ids::{BackupId, CharacterId, PackageId, TagId};
pub use package::{Package, PackageDraft};
pub use tag::{CharacterTag, Tag, TagDraft};
