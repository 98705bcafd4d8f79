//! Input validation for audit submissions and contact details.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use aieo_core::error::AppError;
use aieo_entity::AuditInputs;

/// Audit form fields after trimming.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    #[validate(length(min = 1, message = "Brand name is required"))]
    pub brand_name: String,
    #[validate(length(min = 1, message = "Industry is required"))]
    pub industry: String,
    #[validate(length(min = 1, message = "Website URL is required"))]
    pub website_url: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub service_categories: String,
}

impl From<&AuditInputs> for AuditRequest {
    fn from(inputs: &AuditInputs) -> Self {
        Self {
            brand_name: inputs.brand_name.trim().to_string(),
            industry: inputs.industry.trim().to_string(),
            website_url: inputs.website_url.trim().to_string(),
            keywords: inputs.keywords.trim().to_string(),
            location: inputs.location.trim().to_string(),
            service_categories: inputs.service_categories.trim().to_string(),
        }
    }
}

impl From<AuditRequest> for AuditInputs {
    fn from(req: AuditRequest) -> Self {
        Self {
            brand_name: req.brand_name,
            industry: req.industry,
            website_url: req.website_url,
            keywords: req.keywords,
            location: req.location,
            service_categories: req.service_categories,
        }
    }
}

/// Contact details supplied when requesting full access.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub contact_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

impl ContactDetails {
    /// Trimmed copy.
    pub fn new(contact_name: &str, email: &str) -> Self {
        Self {
            contact_name: contact_name.trim().to_string(),
            email: email.trim().to_string(),
        }
    }
}

/// Trim and check audit inputs. Free-text fields are not parsed.
pub fn validate_inputs(inputs: &AuditInputs) -> Result<AuditInputs, AppError> {
    let request = AuditRequest::from(inputs);
    request
        .validate()
        .map_err(|e| validation_error("Invalid audit inputs", &e))?;
    Ok(request.into())
}

/// Trim and check contact details.
pub fn validate_contact(contact_name: &str, email: &str) -> Result<ContactDetails, AppError> {
    let details = ContactDetails::new(contact_name, email);
    details
        .validate()
        .map_err(|e| validation_error("Invalid contact details", &e))?;
    Ok(details)
}

/// Validation error whose details map camelCase field names to their
/// first message.
pub fn validation_error(message: &str, errors: &ValidationErrors) -> AppError {
    let mut fields = Map::new();
    for (field, errs) in errors.field_errors() {
        let text = errs
            .iter()
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid value".to_string());
        fields.insert(camel_case(&field.to_string()), Value::String(text));
    }
    AppError::validation(message).with_details(Value::Object(fields))
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
