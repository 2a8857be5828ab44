// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::{
    modules::{
        batch::{BatchRequest, RecipientSource},
        common::{parallel::run_with_limit, signal::CancelToken},
        dispatch::report::{DispatchOutcome, DispatchReport},
        error::{code::ErrorCode, BulkMailerResult},
        message,
        metrics::{
            BULKMAILER_BATCH_DISPATCH_TOTAL, BULKMAILER_EMAIL_SEND_DURATION_SECONDS,
            BULKMAILER_EMAIL_SENT_TOTAL, FAILURE, SUCCESS,
        },
        recipient::{parser, RecipientRecord},
        settings::cli::SETTINGS,
        transport::{EmailAddress, InlineAttachment, OutgoingMessage, Transport},
    },
    raise_error,
};

pub mod report;

/// Runs one batch: validates the request, resolves recipients, fans the
/// per-recipient Build+Send step out over a bounded worker pool and folds the
/// outcomes into a single report. A failing recipient never stops the rest of
/// the batch; only request-level validation and parser decode errors are
/// fatal, and those fail before the first send.
pub struct DispatchEngine<T: Transport> {
    transport: Arc<T>,
    from: EmailAddress,
    send_workers: usize,
}

impl<T: Transport + 'static> DispatchEngine<T> {
    pub fn new(transport: Arc<T>, from: EmailAddress) -> Self {
        Self {
            transport,
            from,
            send_workers: SETTINGS.send_workers(),
        }
    }

    pub fn with_send_workers(mut self, send_workers: usize) -> Self {
        self.send_workers = send_workers.max(1);
        self
    }

    pub async fn dispatch(&self, batch: BatchRequest) -> BulkMailerResult<DispatchReport> {
        self.dispatch_with_cancel(batch, CancelToken::new()).await
    }

    /// Like `dispatch`, but stops starting new sends once `cancel` fires.
    /// Sends already handed to the transport finish, and the returned report
    /// covers exactly the recipients that were started.
    pub async fn dispatch_with_cancel(
        &self,
        batch: BatchRequest,
        cancel: CancelToken,
    ) -> BulkMailerResult<DispatchReport> {
        batch.validate()?;
        let records = resolve_recipients(&batch)?;

        let first = records.first().ok_or_else(|| {
            raise_error!(
                "No recipients found in the request".into(),
                ErrorCode::InvalidParameter
            )
        })?;
        if !first.has_address_field() {
            return Err(raise_error!(
                "Recipient source has no 'email' or 'Email' column".into(),
                ErrorCode::MissingEmailColumn
            ));
        }

        let submitted = records.len();
        info!(
            "Dispatching batch: {} recipients, {} send workers",
            submitted, self.send_workers
        );

        let batch = Arc::new(batch);
        let transport = self.transport.clone();
        let from = self.from.clone();

        // Outcomes come back in submission order, so the failure list follows
        // the source order of the recipients even when sends finish out of
        // order.
        let outcomes = run_with_limit(
            self.send_workers,
            records.into_iter().enumerate(),
            &cancel,
            move |(index, record)| {
                let batch = batch.clone();
                let transport = transport.clone();
                let from = from.clone();
                async move {
                    let outcome = send_one(index, transport.as_ref(), &from, &batch, &record).await;
                    Ok(outcome)
                }
            },
        )
        .await?;

        if outcomes.len() < submitted {
            warn!(
                "Batch cancelled: {} of {} recipients were never started",
                submitted - outcomes.len(),
                submitted
            );
        }

        let report = DispatchReport::from_outcomes(outcomes);
        BULKMAILER_BATCH_DISPATCH_TOTAL.inc();
        info!(
            "Batch finished: total={} sent={} failed={}",
            report.total, report.sent, report.failed
        );
        Ok(report)
    }
}

/// Resolves the recipient sequence from the request, in source order. No
/// deduplication: a duplicated address is sent to once per occurrence, each
/// with its own outcome.
fn resolve_recipients(batch: &BatchRequest) -> BulkMailerResult<Vec<RecipientRecord>> {
    match &batch.recipients {
        RecipientSource::Inline(list) => Ok(parser::parse_inline(list)),
        RecipientSource::File { bytes, format } => parser::parse_file(bytes, *format),
    }
}

async fn send_one<T: Transport>(
    index: usize,
    transport: &T,
    from: &EmailAddress,
    batch: &BatchRequest,
    record: &RecipientRecord,
) -> DispatchOutcome {
    let rendered = match message::compose(batch, record) {
        Ok(rendered) => rendered,
        Err(e) => {
            debug!("Recipient #{} failed to build: {}", index, e);
            return DispatchOutcome::Failed {
                recipient: record.identifier(),
                error: e.to_string(),
            };
        }
    };

    let outgoing = OutgoingMessage {
        from: from.clone(),
        to: rendered.to.clone(),
        subject: rendered.subject,
        html_body: rendered.html_body,
        attachments: rendered
            .attachment
            .into_iter()
            .map(|image| InlineAttachment {
                mime_type: image.mime_type,
                content_id: message::INLINE_IMAGE_CID.to_string(),
                content: image.content,
            })
            .collect(),
    };

    let start = Instant::now();
    match transport.send(outgoing).await {
        Ok(()) => {
            BULKMAILER_EMAIL_SEND_DURATION_SECONDS
                .with_label_values(&[SUCCESS])
                .observe(start.elapsed().as_secs_f64());
            BULKMAILER_EMAIL_SENT_TOTAL
                .with_label_values(&[SUCCESS])
                .inc();
            debug!("Recipient #{} sent to {}", index, rendered.to);
            DispatchOutcome::Sent
        }
        Err(e) => {
            BULKMAILER_EMAIL_SEND_DURATION_SECONDS
                .with_label_values(&[FAILURE])
                .observe(start.elapsed().as_secs_f64());
            BULKMAILER_EMAIL_SENT_TOTAL
                .with_label_values(&[FAILURE])
                .inc();
            debug!("Recipient #{} failed to send: {}", index, e);
            DispatchOutcome::Failed {
                recipient: rendered.to,
                error: e.to_string(),
            }
        }
    }
}
