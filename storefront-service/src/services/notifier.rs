use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use std::time::Duration;

use crate::config::SmtpConfig;
use crate::services::error::ServiceError;

/// Outbound notification seam. Delivery is synchronous: callers fail when
/// the notifier fails.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), ServiceError>;
}

#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: SmtpTransport,
    from_address: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, ServiceError> {
        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let mailer = SmtpTransport::relay(&config.host)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!(e.to_string())))?
            .credentials(creds)
            .port(config.port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.host, "SMTP notifier initialized");

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), ServiceError> {
        let to = format!("{} <{}>", recipient_name, recipient_email);
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e: lettre::address::AddressError| ServiceError::Internal(e.into()))?,
            )
            .to(to
                .parse()
                .map_err(|e: lettre::address::AddressError| ServiceError::Internal(e.into()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| ServiceError::Internal(e.into()))?;

        // Send in the blocking pool to keep the async runtime free.
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| ServiceError::Internal(e.into()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %recipient_email, subject = %subject, "Email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e.to_string(), to = %recipient_email, "Failed to send email");
                Err(ServiceError::Delivery(e.to_string()))
            }
        }
    }
}

/// Records messages instead of delivering them. Used by unit tests.
#[derive(Default)]
pub struct MockNotifier {
    pub sent: tokio::sync::Mutex<Vec<SentMessage>>,
    pub fail: bool,
}

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub recipient_email: String,
    pub recipient_name: String,
    pub subject: String,
    pub body: String,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: tokio::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), ServiceError> {
        if self.fail {
            return Err(ServiceError::Delivery("mock delivery failure".to_string()));
        }
        self.sent.lock().await.push(SentMessage {
            recipient_email: recipient_email.to_string(),
            recipient_name: recipient_name.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
