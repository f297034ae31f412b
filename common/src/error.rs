use thiserror::Error;

/// Error kinds for inventory operations.
///
/// Validation failures are rejected at construction time and never
/// coerced. Capability problems degrade the affected field rather than
/// aborting the surrounding batch; they get their own variant so callers
/// can tell them apart from real backend failures.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("device not found: {0}")]
    NotFound(String),

    #[error("capability unavailable: {0}")]
    Unsupported(String),

    #[error("storage backend error: {context}")]
    Storage {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("codec error: {0}")]
    Codec(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InventoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::Unsupported(what.into())
    }

    pub fn storage(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            context: context.into(),
            source: Box::new(source),
        }
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
