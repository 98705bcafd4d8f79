//! Absolute links into the public site.

use std::fmt;

/// Builds report and reviewer URLs from a base such as
/// `https://audit.example.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicLinks {
    base: String,
}

impl PublicLinks {
    /// Create from a base URL. A trailing slash is dropped.
    pub fn new(base: impl AsRef<str>) -> Self {
        Self {
            base: base.as_ref().trim().trim_end_matches('/').to_string(),
        }
    }

    /// Base derived from a request's `Host` and forwarded protocol.
    pub fn from_host(host: &str, proto: Option<&str>) -> Self {
        let proto = proto
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or("https");
        Self::new(format!("{proto}://{}", host.trim()))
    }

    /// The base URL.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Public report page.
    pub fn report(&self, report_id: impl fmt::Display) -> String {
        format!("{}/report/{report_id}", self.base)
    }

    /// Reviewer page for a pending report.
    pub fn review(&self, report_id: impl fmt::Display) -> String {
        format!("{}/admin/review/{report_id}", self.base)
    }
}
