//! Upload validation and data URI encoding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use thiserror::Error;

/// Uploads above this size are rejected before any encoding work.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Image is required")]
    Empty,
    #[error("Image file too large. Please upload an image smaller than 10MB.")]
    TooLarge { size: usize },
}

/// A request-scoped binary upload with its declared MIME type.
///
/// Never outlives the request that carried it; the data URI is built once and
/// handed to the provider client.
#[derive(Debug, Clone)]
pub struct Upload {
    content_type: String,
    bytes: Bytes,
}

impl Upload {
    pub fn new(content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Validate the upload and embed it as `data:<mime>;base64,<payload>`.
    pub fn to_data_uri(&self) -> Result<String, EncodeError> {
        if self.bytes.is_empty() {
            return Err(EncodeError::Empty);
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(EncodeError::TooLarge {
                size: self.bytes.len(),
            });
        }

        Ok(format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_upload_encodes_with_mime_prefix() {
        let upload = Upload::new("image/png", Bytes::from_static(b"\x89PNG\r\n"));
        let uri = upload.to_data_uri().unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn payload_round_trips_through_base64() {
        let payload = b"fake jpeg bytes".as_slice();
        let upload = Upload::new("image/jpeg", Bytes::from_static(payload));
        let uri = upload.to_data_uri().unwrap();
        let encoded = uri.strip_prefix("data:image/jpeg;base64,").unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap(), payload);
    }

    #[test]
    fn empty_upload_is_rejected() {
        let upload = Upload::new("image/png", Bytes::new());
        assert_eq!(upload.to_data_uri(), Err(EncodeError::Empty));
    }

    #[test]
    fn upload_at_limit_is_accepted() {
        let upload = Upload::new("image/png", Bytes::from(vec![0u8; MAX_UPLOAD_BYTES]));
        assert!(upload.to_data_uri().is_ok());
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let size = MAX_UPLOAD_BYTES + 1;
        let upload = Upload::new("image/png", Bytes::from(vec![0u8; size]));
        assert_eq!(upload.to_data_uri(), Err(EncodeError::TooLarge { size }));
    }
}
