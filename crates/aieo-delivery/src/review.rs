//! Reviewer notification through a Discord-compatible webhook.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info};

use aieo_core::config::ReviewConfig;

use crate::error::DeliveryError;

/// Embed accent color.
const EMBED_COLOR: u32 = 0x57F287;

/// Everything the reviewer sees about a pending request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalNotice {
    pub report_id: String,
    pub brand: String,
    pub contact_name: String,
    pub email: String,
    pub industry: String,
    pub website: String,
    pub score: f64,
    /// Link to the reviewer page for this report.
    pub review_url: String,
}

/// Tells a reviewer that a report awaits a decision.
#[async_trait]
pub trait ReviewerNotifier: Send + Sync + std::fmt::Debug {
    /// Whether a delivery target is configured at all.
    fn is_configured(&self) -> bool;

    /// Deliver the notice. Any non-2xx answer is a failure.
    async fn notify(&self, notice: &ApprovalNotice) -> Result<(), DeliveryError>;
}

/// Posts an embed to a chat webhook.
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl DiscordNotifier {
    /// Create a notifier from the `review` config section.
    pub fn new(config: &ReviewConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            webhook_url: config.webhook().map(str::to_string),
        })
    }
}

#[async_trait]
impl ReviewerNotifier for DiscordNotifier {
    fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    async fn notify(&self, notice: &ApprovalNotice) -> Result<(), DeliveryError> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or(DeliveryError::NotConfigured("Reviewer webhook"))?;

        debug!(report_id = %notice.report_id, "Posting approval request to reviewer webhook");
        let response = self
            .client
            .post(url)
            .json(&build_payload(notice))
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

        info!(report_id = %notice.report_id, "Reviewer notified");
        Ok(())
    }
}

/// Render the webhook body for `notice`.
pub fn build_payload(notice: &ApprovalNotice) -> Value {
    let field = |name: &str, value: String, inline: bool| {
        json!({ "name": name, "value": or_dash(value), "inline": inline })
    };

    json!({
        "embeds": [{
            "title": "Report approval requested",
            "color": EMBED_COLOR,
            "fields": [
                field("Brand", notice.brand.clone(), true),
                field("Contact", notice.contact_name.clone(), true),
                field("Email", notice.email.clone(), true),
                field("Industry", notice.industry.clone(), true),
                field("Website", notice.website.clone(), true),
                field("AI Overall Score", format_score(notice.score), true),
                field("Review", format!("[Open review]({})", notice.review_url), false),
            ]
        }]
    })
}

/// Chat embeds reject empty field values.
fn or_dash(value: String) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value
    }
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        score.to_string()
    }
}
