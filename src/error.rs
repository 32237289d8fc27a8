//! # Error Handling
//!
//! This module defines the centralized error type for `mta-config`. It uses
//! `thiserror` to build a single `Error` enum covering every failure mode of
//! the descriptor engine, with contextual fields for diagnostics.
//!
//! ## Taxonomy
//!
//! - **Load failures** (missing or malformed `mta.yaml`) are reported as
//!   `DescriptorParse` or `Filesystem` by the store, but the engine recovers from them
//!   and yields an unloaded model with an empty prefix.
//! - **Update without an existing entity** (`ModuleNotFound`,
//!   `ResourceNotFound`) is a contract violation of the descriptor store and
//!   always propagates.
//! - **Name conflicts** (`NameConflict`): a generated name is already taken
//!   by an entry of another kind. The mutation is refused rather than writing
//!   a second entry with the same name.
//! - **Tool preconditions** (`ToolValidation`) are checked once, up front,
//!   before any mutation runs.
//!
//! `Result<T>` is the crate-wide alias for `std::result::Result<T, Error>`.

use thiserror::Error;

/// Main error type for mta-config operations
#[derive(Error, Debug)]
pub enum Error {
    /// The MTA descriptor could not be parsed into the expected shape.
    #[error("Descriptor parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    DescriptorParse {
        message: String,
        /// Optional hint for how to fix the descriptor
        hint: Option<String>,
    },

    /// A mutation was attempted on an engine whose descriptor failed to load.
    #[error("No MTA descriptor loaded from {dir}")]
    DescriptorNotLoaded { dir: String },

    /// An update referenced a module that is not present in the descriptor.
    #[error("Module not found in descriptor: {name}")]
    ModuleNotFound { name: String },

    /// An update referenced a resource that is not present in the descriptor.
    #[error("Resource not found in descriptor: {name}")]
    ResourceNotFound { name: String },

    /// A generated name is already used by an unrelated module or resource.
    #[error("Name '{name}' is already used by {existing}")]
    NameConflict { name: String, existing: String },

    /// A role-specific parameter block does not match its expected shape.
    #[error("Invalid parameters for '{name}': {message}")]
    InvalidParameters { name: String, message: String },

    /// An error occurred while merging into the extension descriptor.
    #[error("Merge operation error: {operation} - {message}")]
    Merge { operation: String, message: String },

    /// A required external executable is missing or unusable.
    #[error("Tool validation error: {tool} - {message}")]
    ToolValidation { tool: String, message: String },

    /// An external command ran but reported failure.
    #[error("Command failed: {command} - {stderr}")]
    ToolCommand { command: String, stderr: String },

    /// An error occurred while reading or writing descriptor files.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
