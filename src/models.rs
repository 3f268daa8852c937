use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CourseType {
    Mandatory,
    Optional,
}

impl CourseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseType::Mandatory => "Mandatory",
            CourseType::Optional => "Optional",
        }
    }

    /// Anything that is not spelled "mandatory" is treated as optional.
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("mandatory") {
            CourseType::Mandatory
        } else {
            CourseType::Optional
        }
    }
}

impl fmt::Display for CourseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the training-completion export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub id: u32,
    pub trainee_name: String,
    pub email: String,
    pub branch: String,
    pub district_head: String,
    pub supervisor: String,
    pub course_title: String,
    pub completion_rate: f64,
    pub pre_assessment_score: f64,
    pub post_assessment_score: f64,
    pub average_quiz_score: f64,
    pub course_type: CourseType,
    pub completion_date: NaiveDate,
    pub training_hours: f64,
}

impl TrainingRecord {
    /// A post-assessment score of zero means the assessment was not taken.
    pub fn is_assessed(&self) -> bool {
        self.post_assessment_score > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraineeRanking {
    pub rank: usize,
    pub name: String,
    pub email: String,
    pub branch: String,
    pub avg_score: f64,
    pub assessments: usize,
}

/// Ranking row for branch and supervisor leaderboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRanking {
    pub rank: usize,
    pub name: String,
    pub avg_rate: f64,
    pub trainees: usize,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImproverRanking {
    pub rank: usize,
    pub name: String,
    pub email: String,
    pub avg_improvement: f64,
    pub improvements: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRanking {
    pub rank: usize,
    pub course_title: String,
    pub avg_completion: f64,
    pub avg_score: f64,
    pub performance_score: f64,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtRiskTrainee {
    pub name: String,
    pub email: String,
    pub branch: String,
    pub supervisor: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseAttention {
    pub course_title: String,
    pub avg_completion: f64,
    pub avg_score: f64,
    pub learners: usize,
    pub records: usize,
    pub low_completion: bool,
    pub low_score: bool,
}

/// Unrounded completion and quiz means for one course or branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAverages {
    pub name: String,
    pub avg_completion: f64,
    pub avg_quiz_score: f64,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseTypeCount {
    pub course_type: CourseType,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupKpis {
    pub trainees: usize,
    pub avg_completion: f64,
    pub avg_score: f64,
    pub improvement_pct: f64,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupComparison {
    pub field: String,
    pub left_value: String,
    pub right_value: String,
    pub left: GroupKpis,
    pub right: GroupKpis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub avg_completion: f64,
    pub total_hours: f64,
    pub records: usize,
    pub moving_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementPoint {
    pub name: String,
    pub total_hours: f64,
    pub avg_score: f64,
    pub records: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementScatter {
    pub points: Vec<EngagementPoint>,
    pub mean_hours: f64,
    pub mean_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewKpis {
    pub records: usize,
    pub trainees: usize,
    pub learners: usize,
    pub courses: usize,
    pub avg_completion: f64,
    pub avg_score: f64,
    pub assessed: usize,
    pub total_hours: f64,
    pub mandatory: usize,
    pub optional: usize,
}

#[cfg(test)]
pub(crate) fn sample_record(id: u32, name: &str) -> TrainingRecord {
    TrainingRecord {
        id,
        trainee_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        branch: "North".to_string(),
        district_head: "Dana Cruz".to_string(),
        supervisor: "Sam Ortiz".to_string(),
        course_title: "Workplace Safety".to_string(),
        completion_rate: 100.0,
        pre_assessment_score: 0.0,
        post_assessment_score: 0.0,
        average_quiz_score: 0.0,
        course_type: CourseType::Mandatory,
        completion_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        training_hours: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_type_parses_leniently() {
        assert_eq!(CourseType::parse_lenient(" MANDATORY "), CourseType::Mandatory);
        assert_eq!(CourseType::parse_lenient("Optional"), CourseType::Optional);
        assert_eq!(CourseType::parse_lenient("elective"), CourseType::Optional);
    }

    #[test]
    fn zero_post_score_is_not_assessed() {
        let mut record = sample_record(1, "Avery Lee");
        assert!(!record.is_assessed());
        record.post_assessment_score = 0.5;
        assert!(record.is_assessed());
    }
}
