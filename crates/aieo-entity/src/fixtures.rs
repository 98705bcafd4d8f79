//! Sample values for tests in dependent crates.

use serde_json::{Value, json};

use crate::inputs::AuditInputs;
use crate::result::AuditResult;

/// Inputs for a fictional bakery.
pub fn sample_inputs() -> AuditInputs {
    AuditInputs {
        brand_name: "Crumb & Co".to_string(),
        industry: "Bakery".to_string(),
        website_url: "https://crumb.example".to_string(),
        keywords: "sourdough, pastries".to_string(),
        location: "Lisbon".to_string(),
        service_categories: "retail, catering".to_string(),
    }
}

/// A minimal model answer that passes validation.
pub fn sample_result_json() -> Value {
    json!({
        "overallScore": 72,
        "searchVisibilityIndex": 65,
        "aiVisibilityIndex": 58,
        "hallucinationRisk": 20,
        "logicIntegrity": 81,
        "foundation": {
            "score": 70, "status": "Average", "summary": "Entity data is partial.",
            "entityConfidence": 66, "napConsistency": "Consistent",
            "schemaValidation": "LocalBusiness present", "knowledgeGraph": "Partial"
        },
        "technical": {
            "score": 80, "status": "Optimal", "summary": "Fast site.",
            "coreWebVitals": "Good", "pageSpeed": 91, "mobileHealth": "Good"
        },
        "authority": {
            "score": 55, "status": "Average", "summary": "Few mentions.",
            "referringDomains": 42, "sentimentScore": 74,
            "trustSignals": ["Reviews", "Press"]
        },
        "aiBreakdown": [{
            "name": "ChatGPT", "visibilityScore": 60, "recommendationLikelihood": 50,
            "brandAuthority": 45, "citationCount": 3, "sentiment": "Positive",
            "keyTakeaway": "Known locally."
        }],
        "pillarAnalysis": [
            { "title": "Entity Clarity", "evaluation": "Clear", "score": 70 }
        ],
        "technicalChecklist": [
            { "point": "HTTPS", "status": "Pass", "observation": "Valid certificate" }
        ],
        "socialFootprint": [
            { "platform": "Instagram", "presence": "High", "sentiment": "Positive",
              "observation": "Active" }
        ],
        "globalRecommendations": [
            { "title": "Add FAQ schema", "action": "Mark up FAQs", "priority": "High",
              "timeline": "2 weeks" }
        ]
    })
}

/// [`sample_result_json`] as a typed result.
pub fn sample_result() -> AuditResult {
    serde_json::from_value(sample_result_json()).unwrap_or_else(|e| panic!("fixture: {e}"))
}
