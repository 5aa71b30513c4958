//! Contact form submission to a hosted form endpoint.
//!
//! One POST per submission, no retry. The visitor only ever sees one of three
//! fixed messages; details go to the log.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::error::ConfiguratorError;
use crate::settings::ContactSettings;

pub const SENT_MESSAGE: &str = "Thank you for your message! We will get back to you soon.";
pub const REJECTED_MESSAGE: &str = "Something went wrong. Please try again later.";
pub const ERROR_MESSAGE: &str = "An error occurred. Please try again later.";

/// A visitor's enquiry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    pub message: String,
}

impl ContactForm {
    /// Check the required fields. Company is optional.
    pub fn validate(&self) -> Result<(), ConfiguratorError> {
        if self.name.trim().is_empty() {
            return Err(ConfiguratorError::Contact("Name is required".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(ConfiguratorError::Contact("Email is required".to_string()));
        }
        if !looks_like_email(self.email.trim()) {
            return Err(ConfiguratorError::Contact(format!(
                "'{}' is not a valid email address",
                self.email.trim()
            )));
        }
        if self.message.trim().is_empty() {
            return Err(ConfiguratorError::Contact("Message is required".to_string()));
        }
        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Outcome shown to the visitor after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SubmissionStatus {
    Sent(String),
    Failed(String),
}

impl SubmissionStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, SubmissionStatus::Sent(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SubmissionStatus::Sent(m) | SubmissionStatus::Failed(m) => m,
        }
    }
}

/// HTTP client for the contact form endpoint.
pub struct ContactClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl ContactClient {
    pub fn new(settings: &ContactSettings) -> Result<Self, ConfiguratorError> {
        let endpoint = Url::parse(&settings.endpoint).map_err(|e| {
            ConfiguratorError::Config(format!(
                "Invalid contact endpoint '{}': {}",
                settings.endpoint, e
            ))
        })?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("dvr-configurator/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ConfiguratorError::Contact(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Validate and send the form.
    ///
    /// Returns `Err` only when validation fails, in which case nothing was
    /// sent. Network and server failures are reported as `Failed`.
    pub async fn submit(&self, form: &ContactForm) -> Result<SubmissionStatus, ConfiguratorError> {
        form.validate()?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(form)
            .send()
            .await;

        let status = match response {
            Ok(response) if response.status().is_success() => {
                info!("Contact form from {} delivered", form.email.trim());
                SubmissionStatus::Sent(SENT_MESSAGE.to_string())
            }
            Ok(response) => {
                warn!(
                    "Contact endpoint returned {} for submission from {}",
                    response.status(),
                    form.email.trim()
                );
                SubmissionStatus::Failed(REJECTED_MESSAGE.to_string())
            }
            Err(e) => {
                warn!("Contact form submission failed: {}", e);
                SubmissionStatus::Failed(ERROR_MESSAGE.to_string())
            }
        };
        Ok(status)
    }
}
