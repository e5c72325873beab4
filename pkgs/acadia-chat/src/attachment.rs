//! Attachment validation
//!
//! Uploads are performed by an external collaborator which hands back a
//! URL; this module decides whether the upload may become a message at
//! all, and whether it renders as an image or a generic file. Rejections
//! happen before any message is constructed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use acadia_store::MessageBody;

use crate::ChatConfig;

/// An upload the attachment store has accepted but chat has not yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingUpload {
    pub file_name: String,
    pub size: u64,
    pub url: String,
}

/// Validation failures for attachments
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },
    #[error("File is empty")]
    EmptyFile,
    #[error("File name missing")]
    MissingName,
}

/// Validate an upload against the chat config and build its message body
pub fn validate(upload: PendingUpload, config: &ChatConfig) -> Result<MessageBody, AttachmentError> {
    if upload.file_name.trim().is_empty() {
        return Err(AttachmentError::MissingName);
    }
    if upload.size == 0 {
        return Err(AttachmentError::EmptyFile);
    }
    if upload.size > config.max_attachment_size {
        return Err(AttachmentError::TooLarge {
            size: upload.size,
            limit: config.max_attachment_size,
        });
    }

    let body = if is_image(&upload.file_name) {
        MessageBody::Image {
            url: upload.url,
            name: upload.file_name,
        }
    } else {
        MessageBody::File {
            url: upload.url,
            name: upload.file_name,
        }
    };
    Ok(body)
}

fn is_image(file_name: &str) -> bool {
    mime_guess::from_path(file_name)
        .first()
        .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false)
}
