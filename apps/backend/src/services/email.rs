use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::AppError;

/// Outbound mail abstraction so tests can substitute a recording mailer.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body_html: &str,
        body_text: &str,
    ) -> Result<(), AppError>;
}

/// SMTP mailer over lettre's async transport.
pub struct SmtpMailer {
    from_address: String,
    from_name: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let transport = if config.insecure {
            tracing::warn!(
                host = %config.host,
                port = config.port,
                "using unencrypted SMTP transport"
            );
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .build()
        } else {
            let builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| AppError::config(format!("Failed to create SMTP transport: {e}")))?
                .port(config.port);

            if config.username.is_empty() != config.password.is_empty() {
                return Err(AppError::config(
                    "SMTP username and password must both be provided or both be empty",
                ));
            }

            if config.username.is_empty() {
                builder.build()
            } else {
                builder
                    .credentials(Credentials::new(
                        config.username.clone(),
                        config.password.clone(),
                    ))
                    .build()
            }
        };

        Ok(Self {
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
            transport,
        })
    }

    fn from_mailbox(&self) -> Result<Mailbox, AppError> {
        format!("{} <{}>", self.from_name, self.from_address)
            .parse()
            .map_err(|e| AppError::config(format!("Invalid sender address: {e}")))
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body_html: &str,
        body_text: &str,
    ) -> Result<(), AppError> {
        let from = self.from_mailbox()?;
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| AppError::bad_request(format!("Invalid recipient email: {e}")))?;

        let email = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                body_text.to_owned(),
                body_html.to_owned(),
            ))
            .map_err(|e| AppError::internal(format!("Failed to build email: {e}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::internal_with_exception("Failed to send email", e))?;

        tracing::info!(to = %to, subject = %subject, "email sent");
        Ok(())
    }
}
