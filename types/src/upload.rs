//! File-type and size checks for service-center photos and documents.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("{kind} must be one of {allowed}, got {got:?}")]
    UnsupportedType {
        kind: &'static str,
        allowed: String,
        got: String,
    },
    #[error("{kind} is {size} bytes, larger than the {limit_mb} MB limit")]
    TooLarge {
        kind: &'static str,
        size: u64,
        limit_mb: u64,
    },
    #[error("{kind} is empty")]
    Empty { kind: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadKind {
    Photo,
    Document,
}

impl UploadKind {
    pub fn label(self) -> &'static str {
        match self {
            UploadKind::Photo => "photo",
            UploadKind::Document => "document",
        }
    }

    pub fn allowed_types(self) -> &'static [&'static str] {
        match self {
            UploadKind::Photo => &["image/jpeg", "image/jpg", "image/png", "image/webp"],
            UploadKind::Document => &["application/pdf", "image/jpeg", "image/jpg", "image/png"],
        }
    }

    pub const fn max_bytes(self) -> u64 {
        match self {
            UploadKind::Photo => 3 * MB,
            UploadKind::Document => 50 * MB,
        }
    }

    /// Value for the `accept` attribute of a file input.
    pub fn accept(self) -> String {
        self.allowed_types().join(",")
    }

    pub fn validate(self, content_type: &str, size: u64) -> Result<(), UploadError> {
        let mime = essence(content_type);
        if !self.allowed_types().contains(&mime.as_str()) {
            return Err(UploadError::UnsupportedType {
                kind: self.label(),
                allowed: self.allowed_types().join(", "),
                got: mime,
            });
        }

        if size == 0 {
            return Err(UploadError::Empty { kind: self.label() });
        }

        if size > self.max_bytes() {
            return Err(UploadError::TooLarge {
                kind: self.label(),
                size,
                limit_mb: self.max_bytes() / MB,
            });
        }

        Ok(())
    }
}

/// `"Image/PNG; charset=binary"` -> `"image/png"`
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn validate_photo(content_type: &str, size: u64) -> Result<(), UploadError> {
    UploadKind::Photo.validate(content_type, size)
}

pub fn validate_document(content_type: &str, size: u64) -> Result<(), UploadError> {
    UploadKind::Document.validate(content_type, size)
}

/// Best guess at a MIME type from the file name, for browsers that report none.
pub fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Name, type and size of a picked file, enough to check it before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

impl FileMeta {
    pub fn validate(&self, kind: UploadKind) -> Result<(), UploadError> {
        kind.validate(&self.content_type, self.size)
    }

    pub fn size_kb(&self) -> u64 {
        self.size.div_ceil(1024)
    }
}

/// A received file, held until it is forwarded to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn meta(&self) -> FileMeta {
        FileMeta {
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            size: self.bytes.len() as u64,
        }
    }

    pub fn validate(&self, kind: UploadKind) -> Result<(), UploadError> {
        self.meta().validate(kind)
    }
}
