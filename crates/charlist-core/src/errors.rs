use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Failure classes with stable string codes
///
/// Tests and the CLI match on the code, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Persistence
    /// Any fault of the underlying engine: constraint violation, I/O failure,
    /// lost connection, malformed persisted timestamp
    Storage,
    /// An applied migration no longer matches the embedded SQL
    MigrationChecksum,

    // Domain guards
    /// A package is still linked to one or more characters
    PackageInUse,

    // Structural/Validation
    InvalidInput,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Storage => "ERR_STORAGE",
            ExErrorKind::MigrationChecksum => "ERR_MIGRATION_CHECKSUM",
            ExErrorKind::PackageInUse => "ERR_PACKAGE_IN_USE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Structured error passed across crate boundaries
///
/// `kind` drives handling; `op`, `entity_id` and `message` only feed logs and
/// the rendered text.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    pub fn with_op(self, op: impl Into<String>) -> Self {
        Self {
            op: Some(op.into()),
            ..self
        }
    }

    /// Row id (or name) the failure concerns
    pub fn with_entity_id(self, id: impl ToString) -> Self {
        Self {
            entity_id: Some(id.to_string()),
            ..self
        }
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self
        }
    }

    pub fn with_source(self, source: ExError) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..self
        }
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    pub fn is_storage(&self) -> bool {
        self.kind == ExErrorKind::Storage
    }

    /// A package delete refused because characters still link it
    pub fn is_package_in_use(&self) -> bool {
        self.kind == ExErrorKind::PackageInUse
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())?;
        if let Some(op) = &self.op {
            write!(f, " ({op})")?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " [id {entity_id}]")?;
        }
        match &self.source {
            Some(source) => write!(f, "; {source}"),
            None => Ok(()),
        }
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|inner| inner as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures raised above the raw storage layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CharlistError {
    /// Package is still referenced by at least one character
    #[error("Package \"{name}\" is used by {character_count} character(s) and cannot be deleted")]
    PackageInUse {
        package_id: i64,
        name: String,
        character_count: usize,
    },

    /// Persisted timestamp does not match `yyyy-MM-dd HH:mm:ss`
    #[error("Malformed timestamp '{value}': expected yyyy-MM-dd HH:mm:ss")]
    MalformedTimestamp { value: String },

    /// Colour literal could not be parsed
    #[error("Invalid color '{value}': expected #RRGGBB or #AARRGGBB")]
    InvalidColor { value: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<CharlistError> for ExError {
    fn from(err: CharlistError) -> Self {
        let message = err.to_string();
        match err {
            CharlistError::PackageInUse { package_id, .. } => {
                ExError::new(ExErrorKind::PackageInUse)
                    .with_op("delete_package")
                    .with_entity_id(package_id)
                    .with_message(message)
            }
            CharlistError::MalformedTimestamp { .. } => ExError::new(ExErrorKind::Storage)
                .with_op("parse_timestamp")
                .with_message(message),
            CharlistError::InvalidColor { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_color")
                .with_message(message),
            CharlistError::Io { .. } => ExError::new(ExErrorKind::Io).with_message(message),
            CharlistError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<std::io::Error> for CharlistError {
    fn from(err: std::io::Error) -> Self {
        CharlistError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::Storage, "ERR_STORAGE"),
            (ExErrorKind::PackageInUse, "ERR_PACKAGE_IN_USE"),
            (ExErrorKind::MigrationChecksum, "ERR_MIGRATION_CHECKSUM"),
            (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_package_in_use_maps_to_guard_kind() {
        let err: ExError = CharlistError::PackageInUse {
            package_id: 4,
            name: "Core Rules".to_string(),
            character_count: 2,
        }
        .into();

        assert!(err.is_package_in_use());
        assert!(!err.is_storage());
        assert_eq!(err.entity_id(), Some("4"));
        assert!(err.message().contains("Core Rules"));
    }

    #[test]
    fn test_malformed_timestamp_is_storage_error() {
        let err: ExError = CharlistError::MalformedTimestamp {
            value: "yesterday".to_string(),
        }
        .into();
        assert!(err.is_storage());
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::Storage)
            .with_op("sqlite")
            .with_entity_id(7)
            .with_message("NOT NULL constraint failed: characters.name");
        assert_eq!(
            err.to_string(),
            "ERR_STORAGE (sqlite): NOT NULL constraint failed: characters.name [id 7]"
        );
    }

    #[test]
    fn test_source_chain() {
        let inner = ExError::new(ExErrorKind::Storage).with_message("disk I/O error");
        let outer = ExError::new(ExErrorKind::Storage)
            .with_op("update_character")
            .with_source(inner);
        assert_eq!(
            outer.source_error().map(|e| e.message()),
            Some("disk I/O error")
        );
        assert!(std::error::Error::source(&outer).is_some());
    }
}
