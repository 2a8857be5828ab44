// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::{
    modules::{
        batch::{BatchRequest, SharedImage},
        error::{code::ErrorCode, BulkMailerResult},
        recipient::RecipientRecord,
        template,
    },
    raise_error,
};

/// Content id the HTML envelope's `<img>` tag points at when the batch
/// carries a shared image. One id for the whole batch; the bytes are reused
/// for every recipient.
pub const INLINE_IMAGE_CID: &str = "bulkmailer-shared-image";

/// A recipient's fully personalized message, ready to hand to the transport.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<SharedImage>,
}

/// Personalizes the batch templates for one record. A record without a usable
/// address fails here with `MissingAddress` — an error for this recipient
/// only, never for the batch.
pub fn compose(batch: &BatchRequest, record: &RecipientRecord) -> BulkMailerResult<RenderedMessage> {
    let to = record.address().ok_or_else(|| {
        raise_error!(
            "No 'email' or 'Email' value present for this recipient".into(),
            ErrorCode::MissingAddress
        )
    })?;

    let subject = template::render(&batch.subject_template, record);
    let body = template::render(&batch.body_template, record);
    let html_body = envelope_html(batch.tagline(), batch.image.is_some(), &body);

    Ok(RenderedMessage {
        to: to.to_string(),
        subject,
        html_body,
        attachment: batch.image.clone(),
    })
}

fn envelope_html(tagline: &str, has_image: bool, body: &str) -> String {
    let image_block = if has_image {
        format!(
            "<div style=\"margin-bottom: 16px;\"><img src=\"cid:{}\" style=\"max-width: 100%;\" alt=\"\"></div>",
            INLINE_IMAGE_CID
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
            <html>
            <head>
                <meta http-equiv="Content-Type" content="text/html; charset=utf-8">
            </head>
            <body style="word-wrap: break-word; font-family: Arial, Helvetica, sans-serif;">
                {}
                <div>{}</div>
                <div><br></div>
                <div style="color: #777; font-size: 12px; border-top: 1px solid #ddd; padding-top: 8px;">{}</div>
            </body>
            </html>"#,
        image_block,
        template::body_to_html(body),
        html_escape::encode_text(tagline),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::batch::{RecipientSource, SharedImage};
    use std::sync::Arc;

    fn batch() -> BatchRequest {
        BatchRequest {
            subject_template: "Hi {{name}}".into(),
            body_template: "Dear {{name}},\nyour code is {{code}}".into(),
            tagline: Some("Acme & Co".into()),
            image: None,
            recipients: RecipientSource::Inline("unused@x.com".into()),
        }
    }

    fn record(fields: &[(&str, &str)]) -> RecipientRecord {
        let mut record = RecipientRecord::new();
        for (key, value) in fields {
            record.push(*key, *value);
        }
        record
    }

    #[test]
    fn personalizes_subject_and_body() {
        let message = compose(
            &batch(),
            &record(&[("email", "ada@x.com"), ("name", "Ada"), ("code", "42")]),
        )
        .unwrap();
        assert_eq!(message.to, "ada@x.com");
        assert_eq!(message.subject, "Hi Ada");
        assert!(message.html_body.contains("Dear Ada,<br>your code is 42"));
    }

    #[test]
    fn tagline_is_escaped_into_the_envelope() {
        let message = compose(&batch(), &record(&[("email", "a@x.com")])).unwrap();
        assert!(message.html_body.contains("Acme &amp; Co"));
    }

    #[test]
    fn missing_address_is_a_recipient_scoped_error() {
        let error = compose(&batch(), &record(&[("name", "NoMail")])).unwrap_err();
        assert_eq!(error.code(), ErrorCode::MissingAddress);
    }

    #[test]
    fn capitalized_email_column_resolves_the_address() {
        let message = compose(&batch(), &record(&[("Email", "upper@x.com")])).unwrap();
        assert_eq!(message.to, "upper@x.com");
    }

    #[test]
    fn image_adds_one_cid_reference_and_one_attachment() {
        let mut request = batch();
        request.image = Some(SharedImage {
            content: Arc::new(vec![0x89, 0x50, 0x4e, 0x47]),
            mime_type: "image/png".into(),
        });
        let message = compose(&request, &record(&[("email", "a@x.com")])).unwrap();
        assert!(message
            .html_body
            .contains(&format!("cid:{}", INLINE_IMAGE_CID)));
        let attachment = message.attachment.expect("attachment should be carried");
        assert_eq!(attachment.mime_type, "image/png");
    }

    #[test]
    fn no_image_means_no_cid_reference() {
        let message = compose(&batch(), &record(&[("email", "a@x.com")])).unwrap();
        assert!(!message.html_body.contains("cid:"));
        assert!(message.attachment.is_none());
    }
}
