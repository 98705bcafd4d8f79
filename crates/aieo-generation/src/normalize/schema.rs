//! Validate a candidate object into an [`AuditResult`].
//!
//! Validation never stops at the first problem: every failing path is
//! collected so one error message describes the whole response.

use std::fmt;

use serde_json::{Map, Value};

use aieo_entity::AuditResult;
use aieo_entity::result::{
    AuthoritySection, CompetitorData, EngineMetrics, FoundationSection, GlobalRecommendation,
    PillarDetail, SocialPlatform, TechnicalCheckPoint, TechnicalSection, TraditionalRanking,
};

use super::NormalizeError;
use super::coerce::Coerce;

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path, array indices included (`technicalChecklist.3.status`).
    pub path: String,
    /// What was wrong.
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate `value` as an audit result. `sources` is left empty.
pub fn parse_audit_result(value: &Value) -> Result<AuditResult, NormalizeError> {
    let mut v = Validator::default();
    let root = v.object(Some(value), "");

    let result = AuditResult {
        overall_score: v.number(root, "overallScore", ""),
        search_visibility_index: v.number(root, "searchVisibilityIndex", ""),
        ai_visibility_index: v.number(root, "aiVisibilityIndex", ""),
        hallucination_risk: v.number(root, "hallucinationRisk", ""),
        logic_integrity: v.number(root, "logicIntegrity", ""),
        foundation: foundation(&mut v, root),
        technical: technical(&mut v, root),
        authority: authority(&mut v, root),
        ai_breakdown: v.list(root, "aiBreakdown", "", true, engine_metrics),
        pillar_analysis: v.list(root, "pillarAnalysis", "", true, pillar),
        technical_checklist: v.list(root, "technicalChecklist", "", true, checkpoint),
        social_footprint: v.list(root, "socialFootprint", "", true, social),
        traditional_rankings: v.list(root, "traditionalRankings", "", false, ranking),
        competitors: v.list(root, "competitors", "", false, competitor),
        global_recommendations: v.list(root, "globalRecommendations", "", true, recommendation),
        sources: Vec::new(),
    };

    if v.errors.is_empty() {
        Ok(result)
    } else {
        Err(NormalizeError::Schema(v.errors))
    }
}

fn foundation(v: &mut Validator, root: Option<&Map<String, Value>>) -> FoundationSection {
    let obj = v.object(root.and_then(|r| r.get("foundation")), "foundation");
    let p = "foundation";
    FoundationSection {
        score: v.number(obj, "score", p),
        status: v.coerced(obj, "status", p),
        summary: v.string(obj, "summary", p),
        entity_confidence: v.number(obj, "entityConfidence", p),
        nap_consistency: v.string(obj, "napConsistency", p),
        schema_validation: v.string(obj, "schemaValidation", p),
        knowledge_graph: v.coerced(obj, "knowledgeGraph", p),
    }
}

fn technical(v: &mut Validator, root: Option<&Map<String, Value>>) -> TechnicalSection {
    let obj = v.object(root.and_then(|r| r.get("technical")), "technical");
    let p = "technical";
    TechnicalSection {
        score: v.number(obj, "score", p),
        status: v.coerced(obj, "status", p),
        summary: v.string(obj, "summary", p),
        core_web_vitals: v.string(obj, "coreWebVitals", p),
        page_speed: v.number(obj, "pageSpeed", p),
        mobile_health: v.string(obj, "mobileHealth", p),
    }
}

fn authority(v: &mut Validator, root: Option<&Map<String, Value>>) -> AuthoritySection {
    let obj = v.object(root.and_then(|r| r.get("authority")), "authority");
    let p = "authority";
    AuthoritySection {
        score: v.number(obj, "score", p),
        status: v.coerced(obj, "status", p),
        summary: v.string(obj, "summary", p),
        referring_domains: v.number(obj, "referringDomains", p),
        sentiment_score: v.number(obj, "sentimentScore", p),
        trust_signals: v.list(obj, "trustSignals", p, true, |v, item, path| {
            v.string_value(Some(item), path)
        }),
    }
}

fn engine_metrics(v: &mut Validator, item: &Value, path: &str) -> EngineMetrics {
    let obj = v.object(Some(item), path);
    EngineMetrics {
        name: v.string(obj, "name", path),
        visibility_score: v.number(obj, "visibilityScore", path),
        recommendation_likelihood: v.number(obj, "recommendationLikelihood", path),
        brand_authority: v.number(obj, "brandAuthority", path),
        citation_count: v.number(obj, "citationCount", path),
        sentiment: v.string(obj, "sentiment", path),
        key_takeaway: v.string(obj, "keyTakeaway", path),
    }
}

fn pillar(v: &mut Validator, item: &Value, path: &str) -> PillarDetail {
    let obj = v.object(Some(item), path);
    PillarDetail {
        title: v.string(obj, "title", path),
        evaluation: v.string(obj, "evaluation", path),
        score: v.number(obj, "score", path),
    }
}

fn checkpoint(v: &mut Validator, item: &Value, path: &str) -> TechnicalCheckPoint {
    let obj = v.object(Some(item), path);
    TechnicalCheckPoint {
        point: v.string(obj, "point", path),
        status: v.coerced(obj, "status", path),
        observation: v.string(obj, "observation", path),
    }
}

fn social(v: &mut Validator, item: &Value, path: &str) -> SocialPlatform {
    let obj = v.object(Some(item), path);
    SocialPlatform {
        platform: v.string(obj, "platform", path),
        presence: v.coerced(obj, "presence", path),
        sentiment: v.string(obj, "sentiment", path),
        observation: v.string(obj, "observation", path),
    }
}

fn ranking(v: &mut Validator, item: &Value, path: &str) -> TraditionalRanking {
    let obj = v.object(Some(item), path);
    TraditionalRanking {
        engine: v.string(obj, "engine", path),
        rank: v.string(obj, "rank", path),
        status: v.coerced(obj, "status", path),
    }
}

fn competitor(v: &mut Validator, item: &Value, path: &str) -> CompetitorData {
    let obj = v.object(Some(item), path);
    CompetitorData {
        name: v.string(obj, "name", path),
        visibility_score: v.number(obj, "visibilityScore", path),
        primary_strength: v.string(obj, "primaryStrength", path),
        threat_level: v.coerced(obj, "threatLevel", path),
    }
}

fn recommendation(v: &mut Validator, item: &Value, path: &str) -> GlobalRecommendation {
    let obj = v.object(Some(item), path);
    GlobalRecommendation {
        title: v.string(obj, "title", path),
        action: v.string(obj, "action", path),
        priority: v.coerced(obj, "priority", path),
        timeline: v.string(obj, "timeline", path),
    }
}

/// Accumulates field errors while producing placeholder values, so the
/// walk can continue past a failure.
#[derive(Debug, Default)]
struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    fn fail(&mut self, path: &str, message: impl Into<String>) {
        let path = if path.is_empty() { "(root)" } else { path };
        self.errors.push(FieldError {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn object<'a>(&mut self, value: Option<&'a Value>, path: &str) -> Option<&'a Map<String, Value>> {
        match value {
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                self.fail(path, format!("Expected object, received {}", kind(other)));
                None
            }
            None => {
                self.fail(path, "Required");
                None
            }
        }
    }

    /// Resolve a field. A missing parent was already reported, so it yields
    /// no new error.
    fn field<'a>(
        &mut self,
        obj: Option<&'a Map<String, Value>>,
        key: &str,
        parent: &str,
    ) -> Result<(Option<&'a Value>, String), ()> {
        let path = join(parent, key);
        match obj {
            Some(map) => Ok((map.get(key), path)),
            None => Err(()),
        }
    }

    fn number(&mut self, obj: Option<&Map<String, Value>>, key: &str, parent: &str) -> f64 {
        let Ok((value, path)) = self.field(obj, key, parent) else {
            return 0.0;
        };
        match value {
            None => {
                self.fail(&path, "Required");
                0.0
            }
            Some(value) => match coerce_number(value) {
                Some(n) => n,
                None => {
                    self.fail(&path, format!("Expected number, received {}", kind(value)));
                    0.0
                }
            },
        }
    }

    fn string(&mut self, obj: Option<&Map<String, Value>>, key: &str, parent: &str) -> String {
        let Ok((value, path)) = self.field(obj, key, parent) else {
            return String::new();
        };
        self.string_value(value, &path)
    }

    fn string_value(&mut self, value: Option<&Value>, path: &str) -> String {
        match value {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                self.fail(path, format!("Expected string, received {}", kind(other)));
                String::new()
            }
            None => {
                self.fail(path, "Required");
                String::new()
            }
        }
    }

    fn coerced<T: Coerce>(&mut self, obj: Option<&Map<String, Value>>, key: &str, parent: &str) -> T {
        let Ok((value, path)) = self.field(obj, key, parent) else {
            return T::coerce("");
        };
        let raw = self.string_value(value, &path);
        T::coerce(&raw)
    }

    fn list<T>(
        &mut self,
        obj: Option<&Map<String, Value>>,
        key: &str,
        parent: &str,
        required: bool,
        mut item: impl FnMut(&mut Self, &Value, &str) -> T,
    ) -> Vec<T> {
        let Ok((value, path)) = self.field(obj, key, parent) else {
            return Vec::new();
        };
        match value {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, v)| item(self, v, &join(&path, &i.to_string())))
                .collect(),
            None | Some(Value::Null) if !required => Vec::new(),
            None => {
                self.fail(&path, "Required");
                Vec::new()
            }
            Some(other) => {
                self.fail(&path, format!("Expected array, received {}", kind(other)));
                Vec::new()
            }
        }
    }
}

/// Loose numeric coercion: `null`, `false` and blank strings are 0, `true`
/// is 1, numeric strings are parsed. Objects, arrays and other strings fail.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
