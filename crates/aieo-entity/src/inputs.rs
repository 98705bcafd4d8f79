//! The six user-supplied audit inputs.

use serde::{Deserialize, Serialize};

/// Inputs for one audit run, persisted verbatim next to the result.
///
/// Brand name, industry and website URL are required; the remaining fields
/// are free text and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditInputs {
    /// Brand or business name.
    pub brand_name: String,
    /// Industry or vertical.
    pub industry: String,
    /// Website, not parsed.
    pub website_url: String,
    /// Free-text keyword list.
    #[serde(default)]
    pub keywords: String,
    /// Service area.
    #[serde(default)]
    pub location: String,
    /// Free-text service categories.
    #[serde(default)]
    pub service_categories: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_with_optional_fields() {
        let inputs: AuditInputs = serde_json::from_value(serde_json::json!({
            "brandName": "Acme",
            "industry": "Retail",
            "websiteUrl": "acme.com"
        }))
        .expect("deserialize");
        assert_eq!(inputs.brand_name, "Acme");
        assert!(inputs.keywords.is_empty());
        assert!(inputs.service_categories.is_empty());
    }
}
