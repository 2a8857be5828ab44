// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mail_send::mail_builder::headers::address::Address;
use mail_send::mail_builder::MessageBuilder;
use mail_send::smtp::message::IntoMessage;
use mail_send::{Credentials, SmtpClient, SmtpClientBuilder};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;

use crate::{
    modules::{
        error::{code::ErrorCode, BulkMailerResult},
        settings::cli::{Settings, SmtpEncryption},
        utils::generate_message_id,
    },
    raise_error,
};

/// A display name plus address pair, used for the batch sender.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EmailAddress {
    pub name: Option<String>,
    pub address: String,
}

/// An inline attachment referenced from the HTML body by content id. The
/// bytes are shared, not owned, so every recipient's message points at the
/// same buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InlineAttachment {
    pub mime_type: String,
    pub content_id: String,
    pub content: Arc<Vec<u8>>,
}

/// One transport-ready message. The dispatch engine produces exactly one per
/// recipient and never inspects what the transport does with it beyond the
/// returned error text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutgoingMessage {
    pub from: EmailAddress,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<InlineAttachment>,
}

impl OutgoingMessage {
    fn to_builder(&self) -> MessageBuilder<'_> {
        let mut builder = MessageBuilder::new()
            .from(Address::new_address(
                self.from.name.as_deref(),
                self.from.address.as_str(),
            ))
            .to(Address::new_address(None::<&str>, self.to.as_str()))
            .subject(self.subject.as_str())
            .html_body(self.html_body.as_str())
            .message_id(generate_message_id());
        for attachment in &self.attachments {
            builder = builder.inline(
                attachment.mime_type.as_str(),
                attachment.content_id.as_str(),
                attachment.content.as_slice(),
            );
        }
        builder
    }
}

/// Delivers one message to one recipient. Implementations are injected into
/// the dispatch engine; the engine holds no ambient transport state.
pub trait Transport: Send + Sync {
    fn send(&self, message: OutgoingMessage)
        -> impl Future<Output = BulkMailerResult<()>> + Send;
}

pub enum SmtpConnection {
    Plain(SmtpClient<TcpStream>),
    Tls(SmtpClient<TlsStream<TcpStream>>),
}

/// SMTP-backed transport. Connection parameters come from the settings once,
/// at construction; each send opens a session, delivers, and drops it.
#[derive(Debug)]
pub struct SmtpTransport {
    host: String,
    port: u16,
    encryption: SmtpEncryption,
    credentials: Option<(String, String)>,
}

impl SmtpTransport {
    pub fn from_settings(settings: &Settings) -> BulkMailerResult<Self> {
        let host = settings.bulkmailer_smtp_host.clone().ok_or_else(|| {
            raise_error!(
                "SMTP host is not configured, set --bulkmailer-smtp-host".into(),
                ErrorCode::MissingConfiguration
            )
        })?;
        let credentials = match (
            &settings.bulkmailer_smtp_username,
            &settings.bulkmailer_smtp_password,
        ) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            (None, None) => None,
            _ => {
                return Err(raise_error!(
                    "SMTP username and password must be given together".into(),
                    ErrorCode::MissingConfiguration
                ))
            }
        };
        Ok(Self {
            host,
            port: settings.bulkmailer_smtp_port,
            encryption: settings.bulkmailer_smtp_encryption,
            credentials,
        })
    }

    async fn connect(&self) -> BulkMailerResult<SmtpConnection> {
        let mut builder =
            SmtpClientBuilder::new(self.host.clone(), self.port).timeout(Duration::from_secs(30));
        if let Some((username, password)) = &self.credentials {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let connection = match self.encryption {
            SmtpEncryption::Ssl => {
                let client = builder.implicit_tls(true).connect().await.map_err(|e| {
                    raise_error!(format!("{:#?}", e), ErrorCode::SmtpConnectionFailed)
                })?;
                SmtpConnection::Tls(client)
            }
            SmtpEncryption::StartTls => {
                let client = builder.implicit_tls(false).connect().await.map_err(|e| {
                    raise_error!(format!("{:#?}", e), ErrorCode::SmtpConnectionFailed)
                })?;
                SmtpConnection::Tls(client)
            }
            SmtpEncryption::None => {
                let client = builder.connect_plain().await.map_err(|e| {
                    raise_error!(format!("{:#?}", e), ErrorCode::SmtpConnectionFailed)
                })?;
                SmtpConnection::Plain(client)
            }
        };
        Ok(connection)
    }
}

impl Transport for SmtpTransport {
    fn send(
        &self,
        message: OutgoingMessage,
    ) -> impl Future<Output = BulkMailerResult<()>> + Send {
        async move {
            let built = message.to_builder().into_message().map_err(|e| {
                raise_error!(
                    format!("Failed to build message: {}", e),
                    ErrorCode::InternalError
                )
            })?;
            match self.connect().await? {
                SmtpConnection::Plain(mut client) => client
                    .send(built)
                    .await
                    .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
                SmtpConnection::Tls(mut client) => client
                    .send(built)
                    .await
                    .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            }
        }
    }
}
