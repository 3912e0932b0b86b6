//! Error types for `autopalette`

use thiserror::Error;

use crate::ident::{ResourceId, ResourceKind};

/// The error type for `autopalette` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from pack file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Color Codec Errors ====================
    /// A palette color string has the wrong length.
    #[error("invalid color string {text:?}: must be 6 (RRGGBB) or 8 (RRGGBBAA) hex characters")]
    InvalidColorLength {
        /// The offending string.
        text: String,
    },

    /// A palette color string contains non-hexadecimal digits.
    #[error("could not parse color string {text:?} as a hexadecimal integer")]
    InvalidColorDigits {
        /// The offending string.
        text: String,
    },

    // ==================== Identifier Errors ====================
    /// A resource identifier contains characters outside the allowed set.
    #[error("invalid resource identifier: {0}")]
    InvalidIdentifier(String),

    // ==================== Descriptor Errors ====================
    /// A palette override descriptor is not a JSON object.
    #[error("descriptor is not a JSON object")]
    DescriptorNotObject,

    /// A descriptor is missing a required field.
    #[error("descriptor missing required field: {field}")]
    DescriptorMissingField {
        /// The missing field name.
        field: &'static str,
    },

    /// A descriptor field has the wrong JSON type.
    #[error("descriptor field {field} must be {expected}")]
    DescriptorFieldType {
        /// The field name.
        field: &'static str,
        /// The expected JSON type.
        expected: &'static str,
    },

    // ==================== Pack Errors ====================
    /// A source pack reference could not be opened.
    #[error("pack {pack} cannot be opened")]
    PackOpenFailed {
        /// The pack id.
        pack: String,
    },

    /// The requested resource was not found in the pack or container.
    #[error("resource not found: {path}")]
    ResourceNotFound {
        /// The full `<kind dir>/<namespace>/<path>` form of the miss.
        path: String,
    },

    /// The container holds no root resources.
    #[error("root resource not found: {0}")]
    RootResourceNotFound(String),

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding or encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Builds the typed not-found error for a resource lookup miss.
    pub fn not_found(kind: ResourceKind, id: &ResourceId) -> Self {
        Error::ResourceNotFound {
            path: format!("{}/{}/{}", kind.directory(), id.namespace(), id.path()),
        }
    }
}

/// A specialized Result type for `autopalette` operations.
pub type Result<T> = std::result::Result<T, Error>;
