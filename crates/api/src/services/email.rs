//! Access-code email delivery.
//!
//! Supported providers:
//! - `console`: logs the message (development)
//! - `sendgrid`: SendGrid v3 mail API

use async_trait::async_trait;
use domain::services::{AccessCodeMessage, AccessCodeNotifier, NotifierError};
use std::sync::Arc;
use tera::{Context, Tera};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::EmailConfig;

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

pub const ACCESS_CODE_SUBJECT: &str = "Your MICE Event Access Code";

const ACCESS_CODE_HTML: &str = "access_code.html";
const ACCESS_CODE_TEXT: &str = "access_code.txt";

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

impl From<EmailError> for NotifierError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::NotConfigured(msg) => NotifierError::Configuration(msg),
            other => NotifierError::Delivery(other.to_string()),
        }
    }
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
}

/// Email service for transactional messages.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
    templates: Arc<Tera>,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let mut tera = Tera::default();
        tera.add_raw_template(ACCESS_CODE_HTML, include_str!("../../templates/access_code.html"))?;
        tera.add_raw_template(ACCESS_CODE_TEXT, include_str!("../../templates/access_code.txt"))?;

        Ok(Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
            templates: Arc::new(tera),
        })
    }

    /// Sends a message through the configured provider. Disabled email is a
    /// silent no-op.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message),
            "sendgrid" => self.send_sendgrid(message).await,
            provider => Err(EmailError::NotConfigured(format!(
                "unknown email provider '{}'",
                provider
            ))),
        }
    }

    /// Portal URL for an event, if a base URL is configured.
    fn portal_url(&self, event_slug: &str) -> Option<String> {
        let base = self.config.base_url.trim_end_matches('/');
        (!base.is_empty()).then(|| format!("{}/{}/portal", base, event_slug))
    }

    /// Builds the access-code email for a fresh registration. The HTML body
    /// is autoescaped by its `.html` template name.
    pub fn access_code_email(&self, msg: &AccessCodeMessage) -> Result<EmailMessage, EmailError> {
        let mut context = Context::new();
        context.insert("recipient_name", &msg.recipient_name);
        context.insert("event_name", &msg.event_name);
        context.insert("access_code", &msg.access_code);
        context.insert("portal_url", &self.portal_url(&msg.event_slug));
        context.insert("sender_name", &self.config.sender_name);

        let body_text = self.templates.render(ACCESS_CODE_TEXT, &context)?;
        let body_html = self.templates.render(ACCESS_CODE_HTML, &context)?;

        Ok(EmailMessage {
            to: msg.recipient_email.clone(),
            to_name: Some(msg.recipient_name.clone()),
            subject: ACCESS_CODE_SUBJECT.to_string(),
            body_text,
            body_html: Some(body_html),
        })
    }

    fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            to_name = ?message.to_name,
            subject = %message.subject,
            from = %self.config.sender_email,
            "Email (console provider)"
        );
        debug!(body_text = %message.body_text, "Email body");
        Ok(())
    }

    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.trim().is_empty() {
            return Err(EmailError::NotConfigured(
                "sendgrid_api_key is empty".to_string(),
            ));
        }

        let body = sendgrid_body(&message, &self.config.sender_email, &self.config.sender_name);

        let response = self
            .client
            .post(SENDGRID_ENDPOINT)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            info!(to = %message.to, subject = %message.subject, "Email sent via SendGrid");
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(EmailError::ProviderError(format!(
            "SendGrid returned {}: {}",
            status, error_body
        )))
    }
}

#[async_trait]
impl AccessCodeNotifier for EmailService {
    async fn send_access_code(&self, message: &AccessCodeMessage) -> Result<(), NotifierError> {
        let email = self.access_code_email(message)?;
        self.send(email).await.map_err(NotifierError::from)
    }
}

fn sendgrid_body(message: &EmailMessage, sender_email: &str, sender_name: &str) -> serde_json::Value {
    let mut recipient = serde_json::json!({ "email": message.to });
    if let Some(name) = &message.to_name {
        recipient["name"] = serde_json::json!(name);
    }

    let mut content = vec![serde_json::json!({
        "type": "text/plain",
        "value": message.body_text
    })];
    if let Some(html) = &message.body_html {
        content.push(serde_json::json!({ "type": "text/html", "value": html }));
    }

    serde_json::json!({
        "personalizations": [{ "to": [recipient] }],
        "from": { "email": sender_email, "name": sender_name },
        "subject": message.subject,
        "content": content
    })
}
