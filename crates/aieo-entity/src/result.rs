//! The normalized audit report produced by one generation run.
//!
//! Every status-like field is a closed enum. Scores are plain numbers and
//! are not range-checked. Collection lengths are whatever the model
//! returned.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a closed enum that serializes as its variant name.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            /// Return the variant name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_enum!(
    /// Health of a report section or a traditional ranking.
    SectionStatus { Critical, Optimal, Average }
);

closed_enum!(
    /// Outcome of one technical checkpoint.
    CheckStatus { Pass, Fail, Warning }
);

closed_enum!(
    /// Strength of a brand's presence on a social platform.
    Presence { High, Medium, Low, None }
);

closed_enum!(
    /// How much a competitor threatens the audited brand.
    ThreatLevel { Low, Medium, High }
);

closed_enum!(
    /// Urgency of a recommendation.
    Priority { High, Medium, Low }
);

closed_enum!(
    /// Whether the brand appears in a knowledge graph.
    KnowledgeGraph { Yes, Partial, No }
);

/// A complete, validated audit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub overall_score: f64,
    pub search_visibility_index: f64,
    pub ai_visibility_index: f64,
    pub hallucination_risk: f64,
    pub logic_integrity: f64,
    pub foundation: FoundationSection,
    pub technical: TechnicalSection,
    pub authority: AuthoritySection,
    pub ai_breakdown: Vec<EngineMetrics>,
    pub pillar_analysis: Vec<PillarDetail>,
    pub technical_checklist: Vec<TechnicalCheckPoint>,
    pub social_footprint: Vec<SocialPlatform>,
    #[serde(default)]
    pub traditional_rankings: Vec<TraditionalRanking>,
    #[serde(default)]
    pub competitors: Vec<CompetitorData>,
    pub global_recommendations: Vec<GlobalRecommendation>,
    /// Grounding citations returned by the provider, never model text.
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Entity and structured-data findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundationSection {
    pub score: f64,
    pub status: SectionStatus,
    pub summary: String,
    pub entity_confidence: f64,
    pub nap_consistency: String,
    pub schema_validation: String,
    pub knowledge_graph: KnowledgeGraph,
}

/// Site performance findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSection {
    pub score: f64,
    pub status: SectionStatus,
    pub summary: String,
    pub core_web_vitals: String,
    pub page_speed: f64,
    pub mobile_health: String,
}

/// Off-site authority findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthoritySection {
    pub score: f64,
    pub status: SectionStatus,
    pub summary: String,
    pub referring_domains: f64,
    pub sentiment_score: f64,
    pub trust_signals: Vec<String>,
}

/// Visibility of the brand inside one AI engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineMetrics {
    pub name: String,
    pub visibility_score: f64,
    pub recommendation_likelihood: f64,
    pub brand_authority: f64,
    pub citation_count: f64,
    pub sentiment: String,
    pub key_takeaway: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarDetail {
    pub title: String,
    pub evaluation: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalCheckPoint {
    pub point: String,
    pub status: CheckStatus,
    pub observation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPlatform {
    pub platform: String,
    pub presence: Presence,
    pub sentiment: String,
    pub observation: String,
}

/// Position in a classic search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraditionalRanking {
    pub engine: String,
    pub rank: String,
    pub status: SectionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorData {
    pub name: String,
    pub visibility_score: f64,
    pub primary_strength: String,
    pub threat_level: ThreatLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalRecommendation {
    pub title: String,
    pub action: String,
    pub priority: Priority,
    pub timeline: String,
}

/// A web page the provider consulted while grounding the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}
