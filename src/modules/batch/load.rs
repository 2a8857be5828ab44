// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::sync::Arc;

use crate::{
    modules::{
        batch::{BatchRequest, RecipientSource, SharedImage},
        error::{code::ErrorCode, BulkMailerResult},
        recipient::parser::RecipientFileFormat,
        settings::cli::Settings,
    },
    raise_error,
};

/// Builds a `BatchRequest` from the command line: reads the declared
/// recipient file and image into byte buffers so the dispatch core only ever
/// sees data, never paths.
pub fn assemble(settings: &Settings) -> BulkMailerResult<BatchRequest> {
    let subject_template = settings.subject.clone().unwrap_or_default();
    let body_template = match (&settings.body, &settings.body_file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) => fs::read_to_string(path).map_err(|e| {
            raise_error!(
                format!("Failed to read body file '{}': {e}", path.display()),
                ErrorCode::InvalidParameter
            )
        })?,
        (None, None) => String::new(),
    };

    let recipients = match (&settings.recipients_file, &settings.to) {
        (Some(path), _) => {
            let name = path.to_string_lossy();
            let format = RecipientFileFormat::from_file_name(&name).ok_or_else(|| {
                raise_error!(
                    format!("Unsupported recipient file format: '{}'", name),
                    ErrorCode::UnsupportedFileFormat
                )
            })?;
            let bytes = fs::read(path).map_err(|e| {
                raise_error!(
                    format!("Failed to read recipient file '{}': {e}", path.display()),
                    ErrorCode::InvalidParameter
                )
            })?;
            RecipientSource::File { bytes, format }
        }
        (None, Some(list)) => RecipientSource::Inline(list.clone()),
        (None, None) => {
            return Err(raise_error!(
                "No recipients given: pass --recipients-file or --to".into(),
                ErrorCode::InvalidParameter
            ))
        }
    };

    let image = match &settings.image {
        Some(path) => {
            let bytes = fs::read(path).map_err(|e| {
                raise_error!(
                    format!("Failed to read image '{}': {e}", path.display()),
                    ErrorCode::InvalidParameter
                )
            })?;
            let mime_type = mime_guess::from_path(path).first_or_octet_stream();
            Some(SharedImage {
                content: Arc::new(bytes),
                mime_type: mime_type.essence_str().to_string(),
            })
        }
        None => None,
    };

    Ok(BatchRequest {
        subject_template,
        body_template,
        tagline: settings.tagline.clone(),
        image,
        recipients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_recipient_file_and_selects_format_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "email,name").unwrap();
        writeln!(file, "a@x.com,A").unwrap();

        let mut settings = Settings::new_for_test();
        settings.subject = Some("S".into());
        settings.body = Some("B".into());
        settings.recipients_file = Some(file.path().to_path_buf());

        let request = assemble(&settings).unwrap();
        match request.recipients {
            RecipientSource::File { ref bytes, format } => {
                assert_eq!(format, RecipientFileFormat::Csv);
                assert!(bytes.starts_with(b"email,name"));
            }
            _ => panic!("expected a file source"),
        }
    }

    #[test]
    fn unknown_extension_is_an_unsupported_format() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let mut settings = Settings::new_for_test();
        settings.recipients_file = Some(file.path().to_path_buf());

        let error = assemble(&settings).unwrap_err();
        assert_eq!(error.code(), ErrorCode::UnsupportedFileFormat);
    }

    #[test]
    fn declared_but_absent_file_fails_before_any_send() {
        let mut settings = Settings::new_for_test();
        settings.recipients_file = Some("/nonexistent/recipients.csv".into());

        let error = assemble(&settings).unwrap_err();
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn body_file_feeds_the_body_template() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Hello {{{{name}}}}").unwrap();

        let mut settings = Settings::new_for_test();
        settings.body_file = Some(file.path().to_path_buf());
        settings.to = Some("a@x.com".into());

        let request = assemble(&settings).unwrap();
        assert_eq!(request.body_template, "Hello {{name}}");
    }

    #[test]
    fn missing_recipient_source_is_rejected() {
        let settings = Settings::new_for_test();
        let error = assemble(&settings).unwrap_err();
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
    }
}
