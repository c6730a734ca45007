use super::{Backup, CharacterId, CharacterTag, Package, Tag};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Character aggregate root
///
/// The scalar fields map onto the `characters` row. `tags`, `packages` and
/// `backups` hold the full association lists on read, and the desired state
/// on update.
///
/// `name` and `campaign` are required by the schema but kept optional here:
/// a missing value is rejected by the store's NOT NULL constraint, not by
/// this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: Option<String>,
    pub campaign: Option<String>,
    pub last_opened: NaiveDateTime,
    pub sheet_path: String,
    #[serde(default)]
    pub tags: Vec<CharacterTag>,
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub backups: Vec<Backup>,
}

impl Character {
    /// Unsaved character with empty associations
    pub fn new(
        name: impl Into<String>,
        campaign: impl Into<String>,
        last_opened: NaiveDateTime,
        sheet_path: impl Into<String>,
    ) -> Self {
        Self {
            id: CharacterId::UNSAVED,
            name: Some(name.into()),
            campaign: Some(campaign.into()),
            last_opened,
            sheet_path: sheet_path.into(),
            tags: Vec::new(),
            packages: Vec::new(),
            backups: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Persisted tags; drafts are skipped
    pub fn stored_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter_map(CharacterTag::as_stored)
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(CharacterTag::name).collect()
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, TagDraft, TagId};
    use chrono::NaiveDate;

    fn opened() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_new_character_is_unsaved_and_empty() {
        let c = Character::new("Aragorn", "Fellowship", opened(), "/p");
        assert!(c.id.is_unsaved());
        assert_eq!(c.display_name(), "Aragorn");
        assert!(c.tags.is_empty() && c.packages.is_empty() && c.backups.is_empty());
    }

    #[test]
    fn test_stored_tags_skip_drafts() {
        let mut c = Character::new("Aragorn", "Fellowship", opened(), "/p");
        c.tags.push(Tag::new(TagId::new(1), "ranger", Color::GREEN).into());
        c.tags.push(TagDraft::new("king", Color::ORANGE).into());

        let stored: Vec<_> = c.stored_tags().map(|t| t.name.as_str()).collect();
        assert_eq!(stored, vec!["ranger"]);
        assert_eq!(c.tag_names(), vec!["ranger", "king"]);
        assert!(c.has_tag("king"));
    }
}
