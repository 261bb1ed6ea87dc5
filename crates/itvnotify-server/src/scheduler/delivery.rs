//! SMTP delivery over lettre.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use itvnotify_core::config::SmtpConfig;
use itvnotify_core::error::SendError;
use itvnotify_core::notify::MailSender;
use itvnotify_core::record::InspectionRecord;

use super::template;

/// Subject line preserved from the original notifier.
pub const SUBJECT: &str = "Notificacion de Inspeccion Tecnica de Vehiculos";

/// Sends one message per due record through a STARTTLS submission relay.
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    noop: bool,
}

impl SmtpMailSender {
    pub fn new(config: &SmtpConfig) -> Result<Self, SendError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|_| SendError::InvalidAddress(config.from.clone()))?;
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| SendError::Transport(e.to_string()))?
            .port(config.port)
            .timeout(Some(config.timeout()));
        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(Self {
            transport: builder.build(),
            from,
            noop: config.noop,
        })
    }

    fn build_message(
        &self,
        record: &InspectionRecord,
        cc: &[String],
        bcc: &[String],
    ) -> Result<Message, SendError> {
        let to: Mailbox = record
            .recipient_email
            .trim()
            .parse()
            .map_err(|_| SendError::InvalidAddress(record.recipient_email.clone()))?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(SUBJECT);
        for addr in cc {
            builder = builder.cc(addr
                .parse()
                .map_err(|_| SendError::InvalidAddress(addr.clone()))?);
        }
        for addr in bcc {
            builder = builder.bcc(addr
                .parse()
                .map_err(|_| SendError::InvalidAddress(addr.clone()))?);
        }

        let body = template::render(record)?;
        builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(body.html),
                    ),
            )
            .map_err(|e| SendError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send(
        &self,
        record: &InspectionRecord,
        cc: &[String],
        bcc: &[String],
    ) -> Result<(), SendError> {
        let message = self.build_message(record, cc, bcc)?;
        if self.noop {
            info!(
                recipient = %record.recipient_email,
                "smtp noop enabled, delivery reported as sent without dispatch"
            );
            return Ok(());
        }
        self.transport
            .send(message)
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        Ok(())
    }
}
