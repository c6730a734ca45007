use super::PackageId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Persisted rule package catalog row
///
/// Compared by id only, like [`super::Tag`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    /// Globally unique across the catalog
    pub name: String,
    pub description: Option<String>,
    pub file_path: String,
    pub version: Option<String>,
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Package {}

impl Hash for Package {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Package fields supplied by a caller before the store assigns an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDraft {
    pub name: String,
    pub description: Option<String>,
    pub file_path: String,
    pub version: Option<String>,
}

impl PackageDraft {
    pub fn new(name: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            file_path: file_path.into(),
            version: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Attach the id the store generated for this draft
    pub fn into_package(self, id: PackageId) -> Package {
        Package {
            id,
            name: self.name,
            description: self.description,
            file_path: self.file_path,
            version: self.version,
        }
    }
}
