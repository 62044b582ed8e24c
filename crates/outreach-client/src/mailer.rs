use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use outreach_core::config::{SenderConfig, SmtpConfig};
use outreach_core::error::AppError;
use outreach_core::models::GeneratedEmail;
use outreach_core::traits::Mailer;
use uuid::Uuid;

/// Port that speaks TLS from the first byte; every other port uses STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// A file read once at startup and attached to every email.
#[derive(Clone)]
struct AttachmentFile {
    filename: String,
    content_type: ContentType,
    bytes: Vec<u8>,
}

/// Sends drafts as plain-text emails over SMTP, with the configured files
/// attached and a Message-ID in the sender's domain.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    attachments: Vec<AttachmentFile>,
}

impl SmtpMailer {
    /// Builds an authenticated TLS transport from `smtp`.
    ///
    /// Missing credentials, an invalid sender address or an unreadable
    /// attachment are configuration errors, reported before anything is sent.
    pub fn from_config(
        smtp: &SmtpConfig,
        sender: &SenderConfig,
        attachments: &[PathBuf],
    ) -> Result<Self, AppError> {
        let (username, password) = smtp.credentials()?;

        let builder = if smtp.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
        }
        .map_err(|e| AppError::ConfigError(format!("SMTP relay {}: {e}", smtp.host)))?;

        let transport = builder
            .port(smtp.port)
            .credentials(Credentials::new(username, password))
            .timeout(Some(smtp.timeout()))
            .build();

        tracing::info!(host = %smtp.host, port = smtp.port, attachments = attachments.len(), "SMTP mailer ready");
        Self::with_transport(transport, sender, attachments)
    }

    /// Uses an already configured transport.
    pub fn with_transport(
        transport: AsyncSmtpTransport<Tokio1Executor>,
        sender: &SenderConfig,
        attachments: &[PathBuf],
    ) -> Result<Self, AppError> {
        let address: Address = sender.email.trim().parse().map_err(|e| {
            AppError::ConfigError(format!("invalid sender email {:?}: {e}", sender.email))
        })?;
        let name = Some(sender.name.clone()).filter(|n| !n.trim().is_empty());

        Ok(Self {
            transport,
            from: Mailbox::new(name, address),
            attachments: attachments
                .iter()
                .map(|p| load_attachment(p))
                .collect::<Result<_, _>>()?,
        })
    }

    fn build_message(&self, email: &GeneratedEmail) -> Result<Message, AppError> {
        let to_address: Address = email.contact.email.trim().parse().map_err(|e| {
            AppError::DeliveryError(format!("invalid recipient {:?}: {e}", email.contact.email))
        })?;
        let to = Mailbox::new(Some(email.contact.name.clone()), to_address);

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .message_id(Some(message_id(self.from.email.domain())));

        let text = SinglePart::plain(email.body.clone());
        let message = if self.attachments.is_empty() {
            builder.singlepart(text)
        } else {
            let parts = self
                .attachments
                .iter()
                .fold(MultiPart::mixed().singlepart(text), |multipart, file| {
                    multipart.singlepart(
                        Attachment::new(file.filename.clone())
                            .body(file.bytes.clone(), file.content_type.clone()),
                    )
                });
            builder.multipart(parts)
        };

        message.map_err(|e| AppError::DeliveryError(format!("building message: {e}")))
    }
}

fn message_id(domain: &str) -> String {
    format!("<{}@{domain}>", Uuid::new_v4().simple())
}

fn load_attachment(path: &Path) -> Result<AttachmentFile, AppError> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::ConfigError(format!("reading attachment {}: {e}", path.display()))
    })?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment")
        .to_string();

    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        _ => "application/octet-stream",
    };
    let content_type = ContentType::parse(mime)
        .map_err(|e| AppError::ConfigError(format!("content type {mime}: {e}")))?;

    Ok(AttachmentFile {
        filename,
        content_type,
        bytes,
    })
}

impl Mailer for SmtpMailer {
    async fn send(&self, email: &GeneratedEmail) -> Result<(), AppError> {
        let message = self.build_message(email)?;
        self.transport.send(message).await.map_err(|e| {
            AppError::DeliveryError(format!("sending to {}: {e}", email.contact.email))
        })?;
        Ok(())
    }
}
