// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use mime_guess::Mime;

use crate::{
    modules::{
        error::{code::ErrorCode, BulkMailerResult},
        recipient::parser::{self, RecipientFileFormat},
    },
    raise_error,
};

pub mod load;

/// Tagline rendered under the body when the request does not carry one.
pub const DEFAULT_TAGLINE: &str = "Sent with BulkMailer";

/// One image shared by every message in the batch. The bytes sit behind an
/// `Arc` so fanning out across send workers never copies them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SharedImage {
    pub content: Arc<Vec<u8>>,
    pub mime_type: String,
}

/// Where the batch's recipients come from. Exactly one source per request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecipientSource {
    /// Comma-separated addresses typed directly into the request.
    Inline(String),
    /// An uploaded tabular file, already reduced to bytes plus the format
    /// declared by its file name.
    File {
        bytes: Vec<u8>,
        format: RecipientFileFormat,
    },
}

/// Everything needed to dispatch one batch: the shared templates, the
/// optional tagline and image, and the recipient source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchRequest {
    pub subject_template: String,
    pub body_template: String,
    pub tagline: Option<String>,
    pub image: Option<SharedImage>,
    pub recipients: RecipientSource,
}

impl BatchRequest {
    pub fn tagline(&self) -> &str {
        self.tagline
            .as_deref()
            .filter(|tagline| !tagline.trim().is_empty())
            .unwrap_or(DEFAULT_TAGLINE)
    }

    /// Request-level validation, applied before any recipient is parsed in
    /// earnest and before any send is attempted.
    pub fn validate(&self) -> BulkMailerResult<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.subject_template.trim().is_empty() {
            errors.push("Missing required field: subject".into());
        }
        if self.body_template.trim().is_empty() {
            errors.push("Missing required field: body".into());
        }

        match &self.recipients {
            RecipientSource::Inline(list) => {
                if parser::parse_inline(list).is_empty() {
                    errors.push("Recipient list is empty".into());
                }
            }
            RecipientSource::File { bytes, .. } => {
                if bytes.is_empty() {
                    errors.push("Recipient file is empty".into());
                }
            }
        }

        if let Some(image) = &self.image {
            if image.mime_type.parse::<Mime>().is_err() {
                errors.push(format!("Invalid image content type: {}", image.mime_type));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(raise_error!(
                format!("{:#?}", errors),
                ErrorCode::InvalidParameter
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> BatchRequest {
        BatchRequest {
            subject_template: "Hello {{name}}".into(),
            body_template: "Hi {{name}}".into(),
            tagline: None,
            image: None,
            recipients: RecipientSource::Inline("a@x.com".into()),
        }
    }

    #[test]
    fn tagline_falls_back_to_default() {
        let mut request = valid_request();
        assert_eq!(request.tagline(), DEFAULT_TAGLINE);
        request.tagline = Some("  ".into());
        assert_eq!(request.tagline(), DEFAULT_TAGLINE);
        request.tagline = Some("Team Newsletter".into());
        assert_eq!(request.tagline(), "Team Newsletter");
    }

    #[test]
    fn empty_inline_list_is_rejected() {
        let mut request = valid_request();
        request.recipients = RecipientSource::Inline(" , ".into());
        let error = request.validate().unwrap_err();
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn empty_file_buffer_is_rejected() {
        let mut request = valid_request();
        request.recipients = RecipientSource::File {
            bytes: Vec::new(),
            format: RecipientFileFormat::Csv,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn missing_templates_are_rejected_before_any_send() {
        let mut request = valid_request();
        request.subject_template = String::new();
        request.body_template = "  ".into();
        let error = request.validate().unwrap_err();
        assert!(error.message().contains("subject"));
        assert!(error.message().contains("body"));
    }

    #[test]
    fn bad_image_mime_type_is_rejected() {
        let mut request = valid_request();
        request.image = Some(SharedImage {
            content: Arc::new(vec![1, 2, 3]),
            mime_type: "not a mime".into(),
        });
        assert!(request.validate().is_err());
    }
}
