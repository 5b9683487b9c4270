//! Per-source run report, appended to the report sink at the end of every
//! source run and flushed later by the consolidated admin report.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failure,
}

impl RunStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Failure => "failure",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report document stored as `report_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub source: String,
    pub status: RunStatus,
    #[serde(default)]
    pub new_contents: u64,
    #[serde(default)]
    pub total_notified: u64,
    #[serde(default)]
    pub completed_count: usize,
    #[serde(default)]
    pub completed_details: Vec<String>,
    #[serde(default)]
    pub duration_secs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RunReport {
    #[must_use]
    pub fn success(
        source: &str,
        new_contents: u64,
        completed_details: Vec<String>,
        total_notified: u64,
        completed_count: usize,
        duration_secs: f64,
    ) -> Self {
        Self {
            source: source.to_string(),
            status: RunStatus::Success,
            new_contents,
            total_notified,
            completed_count,
            completed_details,
            duration_secs,
            error_message: None,
        }
    }

    #[must_use]
    pub fn failure(source: &str, error_message: String, duration_secs: f64) -> Self {
        Self {
            source: source.to_string(),
            status: RunStatus::Failure,
            new_contents: 0,
            total_notified: 0,
            completed_count: 0,
            completed_details: Vec::new(),
            duration_secs,
            error_message: Some(error_message),
        }
    }

    /// Human-facing label, e.g. `naver_webtoon` becomes `Naver Webtoon`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.source
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().collect::<String>() + chars.as_str()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
