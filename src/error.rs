//! Failures that cross the collaborator boundary.
//!
//! The state engine never produces errors of its own; these types are
//! created by the catalog sources and handed to the engine unchanged.

use thiserror::Error;

use crate::state::data::ItemId;

/// The catalog could not be loaded.
///
/// `Clone` so the error can ride inside UI messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The request never produced a response (DNS, TLS, timeout...)
    #[error("request failed: {0}")]
    Transport(String),

    /// The API answered with a non-success status code
    #[error("API returned HTTP {0}")]
    Status(u16),

    /// The response body was not a valid catalog payload
    #[error("malformed catalog payload: {0}")]
    Decode(String),

    /// The local snapshot cache failed
    #[error("catalog cache error: {0}")]
    Cache(String),
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            LoadError::Status(status.as_u16())
        } else if err.is_decode() {
            LoadError::Decode(err.to_string())
        } else {
            LoadError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Decode(err.to_string())
    }
}

impl From<rusqlite::Error> for LoadError {
    fn from(err: rusqlite::Error) -> Self {
        LoadError::Cache(err.to_string())
    }
}

/// A single product could not be fetched.
///
/// Every failure of an item lookup is reported as "not found"; the cause
/// is kept for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("product {id} not found")]
pub struct NotFoundError {
    pub id: ItemId,
    #[source]
    pub cause: Option<LoadError>,
}

impl NotFoundError {
    /// The API has no item with this id
    pub fn missing(id: ItemId) -> Self {
        Self { id, cause: None }
    }

    /// The lookup failed for another reason
    pub fn caused_by(id: ItemId, cause: LoadError) -> Self {
        Self { id, cause: Some(cause) }
    }
}

/// A product image could not be cached.
///
/// Never fatal: the UI shows a placeholder instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image download failed: {0}")]
    Download(String),

    #[error("unreadable image: {0}")]
    Decode(String),

    #[error("image cache IO failed: {0}")]
    Io(String),
}

impl From<reqwest::Error> for ImageError {
    fn from(err: reqwest::Error) -> Self {
        ImageError::Download(err.to_string())
    }
}

impl From<image::ImageError> for ImageError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => ImageError::Io(io.to_string()),
            other => ImageError::Decode(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ImageError {
    fn from(err: std::io::Error) -> Self {
        ImageError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_not_found_keeps_cause() {
        let err = NotFoundError::caused_by(7, LoadError::Status(500));
        assert_eq!(err.to_string(), "product 7 not found");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("API returned HTTP 500".to_string())
        );

        assert!(NotFoundError::missing(7).source().is_none());
    }

    #[test]
    fn test_json_error_is_decode() {
        let err = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        assert!(matches!(LoadError::from(err), LoadError::Decode(_)));
    }
}
