use std::fmt;

// === StorageError ===

/// Errors raised by the sync key-value storage layer.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// A stored value could not be encoded or decoded as JSON.
    SerializationError(String),
    /// A write would exceed the storage quota.
    QuotaExceeded(String),
    /// The storage backend is not reachable.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
            StorageError::QuotaExceeded(msg) => write!(f, "Storage quota exceeded: {}", msg),
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::SerializationError(e.to_string())
    }
}

// === ToolError ===

/// Reasons a custom tool definition is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolError {
    /// The tool name is empty after trimming.
    EmptyName,
    /// The URL template is empty after trimming.
    EmptyUrl,
    /// The URL template lacks a required placeholder.
    MissingPlaceholder(&'static str),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::EmptyName => write!(f, "Tool name is required"),
            ToolError::EmptyUrl => write!(f, "Tool URL is required"),
            ToolError::MissingPlaceholder(token) => {
                write!(f, "Tool URL must contain the {} placeholder", token)
            }
        }
    }
}

impl std::error::Error for ToolError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// Reading or writing the settings record failed.
    Storage(StorageError),
    /// The index does not refer to a tool in the current catalog.
    InvalidIndex(usize),
    /// The index refers to a builtin tool, which cannot be deleted.
    NotCustomTool(usize),
    /// No custom tool carries the given id.
    ToolNotFound(String),
    /// The custom tool definition was rejected.
    InvalidTool(ToolError),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Storage(e) => write!(f, "Settings storage error: {}", e),
            SettingsError::InvalidIndex(index) => write!(f, "Invalid tool index: {}", index),
            SettingsError::NotCustomTool(index) => {
                write!(f, "Tool at index {} is builtin and cannot be deleted", index)
            }
            SettingsError::ToolNotFound(id) => write!(f, "Custom tool not found: {}", id),
            SettingsError::InvalidTool(e) => write!(f, "Invalid custom tool: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<StorageError> for SettingsError {
    fn from(e: StorageError) -> Self {
        SettingsError::Storage(e)
    }
}

impl From<ToolError> for SettingsError {
    fn from(e: ToolError) -> Self {
        SettingsError::InvalidTool(e)
    }
}

// === UsageError ===

/// Errors related to usage tracking.
#[derive(Debug, Clone, PartialEq)]
pub enum UsageError {
    /// The repository key or tool name was empty.
    InvalidKey(String),
    /// Reading or writing the usage record failed.
    Storage(StorageError),
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::InvalidKey(msg) => write!(f, "Invalid usage key: {}", msg),
            UsageError::Storage(e) => write!(f, "Usage storage error: {}", e),
        }
    }
}

impl std::error::Error for UsageError {}

impl From<StorageError> for UsageError {
    fn from(e: StorageError) -> Self {
        UsageError::Storage(e)
    }
}
