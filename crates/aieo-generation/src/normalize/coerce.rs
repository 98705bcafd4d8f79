//! Free-text model values mapped onto closed enums.
//!
//! Every field has its own keyword list; they overlap on purpose ("strong"
//! is `Optimal` for a section but `High` for social presence). Matching is
//! case-insensitive substring search on the trimmed value, first rule wins.

use aieo_entity::result::{
    CheckStatus, KnowledgeGraph, Presence, Priority, SectionStatus, ThreatLevel,
};

/// Total, deterministic mapping from any string to one enum member.
pub trait Coerce: Sized {
    /// Map `raw` to a member of `Self`.
    fn coerce(raw: &str) -> Self;
}

fn normalized(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn mentions(value: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| value.contains(k))
}

impl Coerce for SectionStatus {
    fn coerce(raw: &str) -> Self {
        let v = normalized(raw);
        if mentions(&v, &["optimal", "excellent", "strong", "good"]) {
            Self::Optimal
        } else if mentions(&v, &["critical", "poor", "weak", "bad"]) {
            Self::Critical
        } else {
            Self::Average
        }
    }
}

impl Coerce for CheckStatus {
    fn coerce(raw: &str) -> Self {
        let v = normalized(raw);
        if v == "pass" || mentions(&v, &["optimal", "excellent", "good", "strong", "yes"]) {
            Self::Pass
        } else if v == "fail" || mentions(&v, &["critical", "poor", "bad", "no"]) {
            Self::Fail
        } else {
            Self::Warning
        }
    }
}

impl Coerce for Presence {
    fn coerce(raw: &str) -> Self {
        let v = normalized(raw);
        if mentions(&v, &["high", "strong", "active"]) {
            Self::High
        } else if mentions(&v, &["none", "absent", "n/a"]) {
            Self::None
        } else if mentions(&v, &["low", "minimal", "weak"]) {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

impl Coerce for ThreatLevel {
    fn coerce(raw: &str) -> Self {
        let v = normalized(raw);
        if mentions(&v, &["high", "critical", "severe"]) {
            Self::High
        } else if mentions(&v, &["low", "minimal"]) {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

impl Coerce for Priority {
    fn coerce(raw: &str) -> Self {
        let v = normalized(raw);
        if mentions(&v, &["high", "critical", "urgent"]) {
            Self::High
        } else if mentions(&v, &["low", "minor"]) {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

impl Coerce for KnowledgeGraph {
    fn coerce(raw: &str) -> Self {
        let v = normalized(raw);
        if mentions(&v, &["yes", "full", "complete", "true"]) {
            Self::Yes
        } else if mentions(&v, &["no", "none", "false"]) {
            Self::No
        } else {
            Self::Partial
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_status() {
        assert_eq!(SectionStatus::coerce("Excellent"), SectionStatus::Optimal);
        assert_eq!(SectionStatus::coerce("  STRONG foundation "), SectionStatus::Optimal);
        assert_eq!(SectionStatus::coerce("Poor"), SectionStatus::Critical);
        assert_eq!(SectionStatus::coerce("Needs work"), SectionStatus::Average);
        assert_eq!(SectionStatus::coerce(""), SectionStatus::Average);
    }

    #[test]
    fn test_check_status() {
        assert_eq!(CheckStatus::coerce("PASS"), CheckStatus::Pass);
        assert_eq!(CheckStatus::coerce("Yes, present"), CheckStatus::Pass);
        assert_eq!(CheckStatus::coerce("fail"), CheckStatus::Fail);
        assert_eq!(CheckStatus::coerce("Not found"), CheckStatus::Fail);
        assert_eq!(CheckStatus::coerce("Partial"), CheckStatus::Warning);
    }

    #[test]
    fn test_presence_order_matters() {
        assert_eq!(Presence::coerce("Strong and active"), Presence::High);
        assert_eq!(Presence::coerce("N/A"), Presence::None);
        assert_eq!(Presence::coerce("Minimal"), Presence::Low);
        assert_eq!(Presence::coerce("Moderate"), Presence::Medium);
    }

    #[test]
    fn test_threat_and_priority() {
        assert_eq!(ThreatLevel::coerce("Severe"), ThreatLevel::High);
        assert_eq!(ThreatLevel::coerce("minimal"), ThreatLevel::Low);
        assert_eq!(ThreatLevel::coerce("moderate"), ThreatLevel::Medium);
        assert_eq!(Priority::coerce("URGENT"), Priority::High);
        assert_eq!(Priority::coerce("Minor"), Priority::Low);
        assert_eq!(Priority::coerce("Normal"), Priority::Medium);
    }

    #[test]
    fn test_knowledge_graph() {
        assert_eq!(KnowledgeGraph::coerce("Complete"), KnowledgeGraph::Yes);
        assert_eq!(KnowledgeGraph::coerce("false"), KnowledgeGraph::No);
        assert_eq!(KnowledgeGraph::coerce("Partial"), KnowledgeGraph::Partial);
    }

    #[test]
    fn test_same_word_differs_by_field() {
        assert_eq!(SectionStatus::coerce("strong"), SectionStatus::Optimal);
        assert_eq!(Presence::coerce("strong"), Presence::High);
        assert_eq!(CheckStatus::coerce("strong"), CheckStatus::Pass);
    }

    #[test]
    fn test_coercion_is_total_and_deterministic() {
        let samples = [
            "", " ", "Optimal", "optimal!", "ÜBER", "n/a", "no", "none", "12", "🚀",
            "critical but good", "Warning", "unknown", "TRUE", "null",
        ];
        for raw in samples {
            assert!(SectionStatus::ALL.contains(&SectionStatus::coerce(raw)));
            assert!(CheckStatus::ALL.contains(&CheckStatus::coerce(raw)));
            assert!(Presence::ALL.contains(&Presence::coerce(raw)));
            assert!(ThreatLevel::ALL.contains(&ThreatLevel::coerce(raw)));
            assert!(Priority::ALL.contains(&Priority::coerce(raw)));
            assert!(KnowledgeGraph::ALL.contains(&KnowledgeGraph::coerce(raw)));
            assert_eq!(SectionStatus::coerce(raw), SectionStatus::coerce(raw));
            assert_eq!(Presence::coerce(raw), Presence::coerce(raw));
        }
    }
}
