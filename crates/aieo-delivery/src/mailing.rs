//! Mailing-list subscriber sync (MailerLite REST API).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use aieo_core::config::MailingListConfig;

use crate::error::DeliveryError;
use crate::truncate;

/// Cap on short custom fields.
const SHORT_FIELD_LIMIT: usize = 255;
/// Cap on the report link.
const LINK_FIELD_LIMIT: usize = 1024;

/// A contact to add to the mailing list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subscriber {
    pub email: String,
    pub name: Option<String>,
    pub company: String,
    pub industry: String,
    pub website: String,
    pub keywords: String,
    pub report_url: Option<String>,
    pub ai_score: Option<f64>,
}

/// Result of a sync attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The provider accepted the subscriber.
    Synced,
    /// No usable API key; nothing was sent.
    Skipped,
}

/// Destination for approved leads.
#[async_trait]
pub trait LeadSink: Send + Sync + std::fmt::Debug {
    /// Create or update the subscriber.
    async fn add_subscriber(&self, subscriber: &Subscriber) -> Result<SyncOutcome, DeliveryError>;
}

#[derive(Debug, Serialize)]
struct SubscriberRequest<'a> {
    email: &'a str,
    fields: SubscriberFields,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<Vec<&'a str>>,
}

#[derive(Debug, Serialize)]
struct SubscriberFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    company: String,
    industry: String,
    website: String,
    keywords: String,
    #[serde(rename = "assessment", skip_serializing_if = "Option::is_none")]
    report_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ai_score: Option<f64>,
}

/// MailerLite client.
#[derive(Clone)]
pub struct MailerLiteClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    group_id: Option<String>,
}

impl std::fmt::Debug for MailerLiteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerLiteClient")
            .field("base_url", &self.base_url)
            .field("configured", &self.api_key.is_some())
            .field("group_id", &self.group_id)
            .finish()
    }
}

impl MailerLiteClient {
    /// Create a client from the `mailing_list` config section.
    pub fn new(config: &MailingListConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.key().map(str::to_string),
            group_id: config.group().map(str::to_string),
        })
    }

    fn request_body<'a>(&'a self, subscriber: &'a Subscriber) -> SubscriberRequest<'a> {
        SubscriberRequest {
            email: &subscriber.email,
            fields: SubscriberFields {
                name: subscriber
                    .name
                    .as_deref()
                    .map(|n| truncate(n, SHORT_FIELD_LIMIT)),
                company: truncate(&subscriber.company, SHORT_FIELD_LIMIT),
                industry: truncate(&subscriber.industry, SHORT_FIELD_LIMIT),
                website: truncate(&subscriber.website, SHORT_FIELD_LIMIT),
                keywords: truncate(&subscriber.keywords, SHORT_FIELD_LIMIT),
                report_link: subscriber
                    .report_url
                    .as_deref()
                    .map(|u| truncate(u, LINK_FIELD_LIMIT)),
                ai_score: subscriber.ai_score,
            },
            status: "active",
            groups: self.group_id.as_deref().map(|g| vec![g]),
        }
    }
}

#[async_trait]
impl LeadSink for MailerLiteClient {
    async fn add_subscriber(&self, subscriber: &Subscriber) -> Result<SyncOutcome, DeliveryError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Mailing-list API key is missing or invalid, subscriber sync skipped");
            return Ok(SyncOutcome::Skipped);
        };

        let response = self
            .client
            .post(format!("{}/subscribers", self.base_url))
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&self.request_body(subscriber))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(300).collect(),
            });
        }

        info!(status = status.as_u16(), "Subscriber synced to mailing list");
        Ok(SyncOutcome::Synced)
    }
}
