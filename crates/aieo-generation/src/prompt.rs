//! Instruction template sent to the generative model.

use aieo_entity::AuditInputs;

/// Engines the model is asked to score.
pub const ENGINES: [&str; 3] = ["ChatGPT", "Gemini", "Perplexity"];

/// Checklist length requested from the model.
pub const CHECKLIST_POINTS: usize = 22;

/// Visibility pillars requested from the model.
pub const PILLARS: [&str; 5] = ["Crawl", "Answer", "AI Knowledge", "Brand Authority", "Trust"];

/// Social platforms requested from the model.
pub const SOCIAL_PLATFORMS: usize = 6;

/// Recommendations requested from the model.
pub const RECOMMENDATIONS: usize = 3;

const FRAMEWORK: &str = "\
AIEO FRAMEWORK CONTEXT:
1. Crawl Layer (SEO Foundation): Indexable architecture, schema, speed.
2. Answer Layer (AEO Structure): Q&A formatting, entity definitions, extractable data.
3. AI Knowledge Layer (AIO Signals): Topical authority, brand mentions, E-E-A-T.";

const RESPONSE_SHAPE: &str = r#"{
  "overallScore": number (0-100),
  "searchVisibilityIndex": number (0-100),
  "aiVisibilityIndex": number (0-100),
  "hallucinationRisk": number (0-100),
  "logicIntegrity": number (0-100),
  "foundation": {
    "score": number,
    "status": "Critical" | "Optimal" | "Average",
    "summary": string,
    "entityConfidence": number,
    "napConsistency": string,
    "schemaValidation": string,
    "knowledgeGraph": "Yes" | "Partial" | "No"
  },
  "technical": {
    "score": number,
    "status": "Critical" | "Optimal" | "Average",
    "summary": string,
    "coreWebVitals": string,
    "pageSpeed": number,
    "mobileHealth": string
  },
  "aiBreakdown": [
    {
      "name": string,
      "visibilityScore": number,
      "recommendationLikelihood": number,
      "brandAuthority": number,
      "citationCount": number,
      "sentiment": string,
      "keyTakeaway": string
    }
  ],
  "pillarAnalysis": [
    { "title": string, "evaluation": string, "score": number }
  ],
  "technicalChecklist": [
    {
      "point": string,
      "status": "Pass" | "Fail" | "Warning" (ONLY use these 3 exact strings),
      "observation": string
    }
  ],
  "socialFootprint": [
    {
      "platform": string,
      "presence": "High" | "Medium" | "Low" | "None" (ONLY use these 4 exact strings),
      "sentiment": string,
      "observation": string
    }
  ],
  "authority": {
    "score": number,
    "status": "Critical" | "Optimal" | "Average",
    "summary": string,
    "referringDomains": number,
    "sentimentScore": number,
    "trustSignals": array of strings
  },
  "traditionalRankings": [
    { "engine": string, "rank": string, "status": "Critical" | "Optimal" | "Average" }
  ],
  "competitors": [
    {
      "name": string,
      "visibilityScore": number,
      "primaryStrength": string,
      "threatLevel": "Low" | "Medium" | "High"
    }
  ],
  "globalRecommendations": [
    {
      "title": string,
      "action": string,
      "priority": "High" | "Medium" | "Low",
      "timeline": string
    }
  ]
}"#;

/// Render the audit prompt for `inputs`.
///
/// Deterministic: equal inputs always produce the same text.
pub fn build_prompt(inputs: &AuditInputs) -> String {
    let AuditInputs {
        brand_name,
        industry,
        website_url,
        keywords,
        location,
        service_categories,
    } = inputs;

    let requirements = [
        "You must return ONLY raw, valid JSON matching the requested schema. \
         Do not include markdown formatting like ```json. Ensure all quotes are escaped properly."
            .to_string(),
        "Return a single, valid JSON object following the requested schema.".to_string(),
        "Provide a professional executive analysis in 'foundation.summary' focusing on why \
         AI engines might or might not prioritize this brand."
            .to_string(),
        format!(
            "Engine Breakdown: Exactly {} platforms ({}).",
            ENGINES.len(),
            ENGINES.join(", ")
        ),
        format!("Technical Checklist: Provide a list of exactly {CHECKLIST_POINTS} technical checkpoints."),
        format!(
            "Visibility Factors (pillarAnalysis): {} items ({}).",
            PILLARS.len(),
            PILLARS.join(", ")
        ),
        format!("Social Footprint: Analyze brand presence across {SOCIAL_PLATFORMS} major platforms."),
        format!("Action Plan: {RECOMMENDATIONS} prioritized recommendations."),
    ];

    let mut prompt = format!(
        "Perform a high-precision digital visibility and AIEO (Artificial Intelligence Engine \
         Optimization) audit for \"{brand_name}\".\n\n{FRAMEWORK}\n\nCRITICAL REQUIREMENTS:\n"
    );
    for line in &requirements {
        prompt.push_str("- ");
        prompt.push_str(line);
        prompt.push('\n');
    }
    prompt.push_str(&format!(
        "\nENTITY: {brand_name} ({website_url}), {industry} in {location}.\n\
         KEYWORDS: {keywords}.\n\
         SERVICES: {service_categories}.\n\n\
         CRITICAL INSTRUCTION: You MUST return a raw JSON object. Do not wrap it in markdown. \
         The JSON MUST strictly adhere to this exact structure. Do not omit any keys.\n\n"
    ));
    prompt.push_str(RESPONSE_SHAPE);
    prompt
}
