use serde::{Deserialize, Serialize};

macro_rules! store_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Sentinel for "not yet persisted"
            pub const UNSAVED: Self = Self(0);

            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw rowid value
            pub const fn get(self) -> i64 {
                self.0
            }

            pub const fn is_unsaved(self) -> bool {
                self.0 == 0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

store_id!(
    /// Store-assigned identifier of a character row
    CharacterId
);
store_id!(
    /// Store-assigned identifier of a tag catalog row
    TagId
);
store_id!(
    /// Store-assigned identifier of a rule package catalog row
    PackageId
);
store_id!(
    /// Store-assigned identifier of a backup row; `UNSAVED` marks a backup
    /// the synchronization step must insert
    BackupId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unsaved_sentinel() {
        assert!(BackupId::default().is_unsaved());
        assert_eq!(BackupId::UNSAVED.get(), 0);
        assert!(!BackupId::new(5).is_unsaved());
    }

    #[test]
    fn test_ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&CharacterId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
