//! Error types and handling for the `pollenflug` crate

use thiserror::Error;

/// Main error type for the `pollenflug` crate
#[derive(Error, Debug)]
pub enum PollenflugError {
    /// Transport errors: network failure, bad status, malformed body
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Requested region/partregion pair is not part of the forecast
    #[error("Region {region_id}-{partregion_id} not found")]
    RegionNotFound { region_id: i64, partregion_id: i64 },

    /// Requested allergen is not reported for the region
    #[error("Allergen '{allergen}' not reported for region {region_id}-{partregion_id}")]
    AllergenNotFound {
        region_id: i64,
        partregion_id: i64,
        allergen: String,
    },

    /// A forecast value code has no matching legend entry
    #[error("No legend entry for value code '{code}'")]
    Legend { code: String },

    /// The API payload could not be interpreted
    #[error("Malformed payload: {message}")]
    Payload { message: String },

    /// Cache snapshot errors, downgraded to log lines before reaching callers
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PollenflugError {
    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new payload error
    pub fn payload<S: Into<String>>(message: S) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Whether this error is an expected lookup miss rather than a hard failure
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PollenflugError::RegionNotFound { .. } | PollenflugError::AllergenNotFound { .. }
        )
    }

    /// Numeric status code used by the CLI's JSON error objects
    #[must_use]
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() { 404 } else { 500 }
    }
}
