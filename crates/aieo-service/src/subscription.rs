//! Direct mailing-list sign-up from the public site.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use validator::Validate;

use aieo_core::error::AppError;
use aieo_core::types::{PublicLinks, ReportId};
use aieo_delivery::{LeadSink, Subscriber, SyncOutcome};

use crate::validation::validation_error;

/// Sign-up form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub keywords: String,
    /// Link supplied by the client; ignored when `report_id` is present.
    #[serde(default)]
    pub report_url: Option<String>,
    #[serde(default)]
    pub report_id: Option<ReportId>,
}

impl SubscribeRequest {
    /// Copy with surrounding whitespace removed from every text field.
    fn trimmed(&self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            brand_name: self.brand_name.trim().to_string(),
            industry: self.industry.trim().to_string(),
            website_url: self.website_url.trim().to_string(),
            keywords: self.keywords.trim().to_string(),
            report_url: self
                .report_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            report_id: self.report_id,
        }
    }
}

/// Adds visitors to the mailing list.
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    sink: Arc<dyn LeadSink>,
}

impl SubscriptionService {
    pub fn new(sink: Arc<dyn LeadSink>) -> Self {
        Self { sink }
    }

    /// Validate the form and push it to the mailing list. The report link is
    /// rebuilt from `links` whenever a report id is given.
    pub async fn subscribe(
        &self,
        request: &SubscribeRequest,
        links: &PublicLinks,
    ) -> Result<SyncOutcome, AppError> {
        let request = request.trimmed();
        request
            .validate()
            .map_err(|e| validation_error("Invalid subscription", &e))?;

        let report_url = match request.report_id {
            Some(id) => Some(links.report(id)),
            None => request.report_url,
        };

        let subscriber = Subscriber {
            email: request.email,
            name: None,
            company: request.brand_name,
            industry: request.industry,
            website: request.website_url,
            keywords: request.keywords,
            report_url,
            ai_score: None,
        };

        let outcome = self.sink.add_subscriber(&subscriber).await?;
        info!(outcome = ?outcome, "Subscription processed");
        Ok(outcome)
    }
}
