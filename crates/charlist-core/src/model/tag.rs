use super::{Color, TagId};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Persisted tag catalog row
///
/// Equality and hashing use the store-assigned id only: two tags with the
/// same name but different ids are different tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    /// Globally unique across the catalog
    pub name: String,
    pub color: Color,
}

impl Tag {
    pub fn new(id: TagId, name: impl Into<String>, color: Color) -> Self {
        Self {
            id,
            name: name.into(),
            color,
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Tag value that has not been persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDraft {
    pub name: String,
    pub color: Color,
}

impl TagDraft {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Tag as held on a character aggregate
///
/// Reads always yield `Stored`. Callers add `Draft` entries to request a
/// tag by name; synchronization resolves them through get-or-create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CharacterTag {
    Stored(Tag),
    Draft(TagDraft),
}

impl CharacterTag {
    /// Catalog identity, `None` for drafts
    pub fn id(&self) -> Option<TagId> {
        match self {
            CharacterTag::Stored(tag) => Some(tag.id),
            CharacterTag::Draft(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CharacterTag::Stored(tag) => &tag.name,
            CharacterTag::Draft(draft) => &draft.name,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            CharacterTag::Stored(tag) => tag.color,
            CharacterTag::Draft(draft) => draft.color,
        }
    }

    pub fn as_stored(&self) -> Option<&Tag> {
        match self {
            CharacterTag::Stored(tag) => Some(tag),
            CharacterTag::Draft(_) => None,
        }
    }
}

impl From<Tag> for CharacterTag {
    fn from(tag: Tag) -> Self {
        CharacterTag::Stored(tag)
    }
}

impl From<TagDraft> for CharacterTag {
    fn from(draft: TagDraft) -> Self {
        CharacterTag::Draft(draft)
    }
}
