//! Search domain models.

use serde::{Deserialize, Serialize};

use crate::error::{FynddError, Result};

/// Upper bound on an image search upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Mode discriminator sent alongside every hybrid-search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Text,
    Image,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Text => "text",
            SearchMode::Image => "image",
        }
    }
}

/// Binary image data for an image search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    pub file_name: String,
}

impl ImageBlob {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            file_name: file_name.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Checks the blob is an image no larger than `max_bytes`.
    pub fn validate(&self, max_bytes: usize) -> Result<()> {
        let essence = self
            .mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !essence.starts_with("image/") {
            return Err(FynddError::InvalidImage(format!(
                "Please choose an image file (got '{}').",
                self.mime_type
            )));
        }
        if self.is_empty() {
            return Err(FynddError::InvalidImage("The image is empty.".to_string()));
        }
        if self.len() > max_bytes {
            return Err(FynddError::InvalidImage(format!(
                "The image is too large ({} bytes, limit {} bytes).",
                self.len(),
                max_bytes
            )));
        }
        Ok(())
    }
}

/// A search request: free text or an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Text(String),
    Image(ImageBlob),
}

impl SearchQuery {
    pub fn text(query: impl Into<String>) -> Self {
        Self::Text(query.into())
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            SearchQuery::Text(_) => SearchMode::Text,
            SearchQuery::Image(_) => SearchMode::Image,
        }
    }

    /// Validates the query before any network call and returns the form that
    /// should be sent (text trimmed).
    pub fn prepared(self, max_image_bytes: usize) -> Result<SearchQuery> {
        match self {
            SearchQuery::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(FynddError::EmptyQuery);
                }
                Ok(SearchQuery::Text(trimmed.to_string()))
            }
            SearchQuery::Image(blob) => {
                blob.validate(max_image_bytes)?;
                Ok(SearchQuery::Image(blob))
            }
        }
    }
}
