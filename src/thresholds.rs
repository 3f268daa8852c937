use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InsightsError, Result};

pub const AT_RISK_COMPLETION: f64 = 30.0;
pub const AT_RISK_SCORE: f64 = 50.0;
pub const COURSE_ATTENTION_COMPLETION: f64 = 60.0;
pub const COURSE_ATTENTION_SCORE: f64 = 60.0;

/// Cut-offs used by the at-risk and course-attention reports.
///
/// Missing keys in a threshold file fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub at_risk_completion: f64,
    pub at_risk_score: f64,
    pub course_attention_completion: f64,
    pub course_attention_score: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            at_risk_completion: AT_RISK_COMPLETION,
            at_risk_score: AT_RISK_SCORE,
            course_attention_completion: COURSE_ATTENTION_COMPLETION,
            course_attention_score: COURSE_ATTENTION_SCORE,
        }
    }
}

impl Thresholds {
    pub fn from_json(json: &str) -> Result<Self> {
        let thresholds: Thresholds = serde_json::from_str(json)?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        check("at_risk_completion", self.at_risk_completion)?;
        check("at_risk_score", self.at_risk_score)?;
        check("course_attention_completion", self.course_attention_completion)?;
        check("course_attention_score", self.course_attention_score)?;
        Ok(())
    }
}

fn check(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(InsightsError::InvalidThreshold { name, value })
    }
}
