use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::leaderboard::top_improvers;
use crate::models::{AtRiskTrainee, CourseAttention, ImproverRanking, TrainingRecord};
use crate::stats::{mean, round1, OrderedGroups};
use crate::thresholds::Thresholds;

/// Reasons a single record puts its trainee at risk, each naming the course.
pub fn risk_reasons(record: &TrainingRecord, thresholds: &Thresholds) -> Vec<String> {
    let mut reasons = Vec::new();
    if record.completion_rate < thresholds.at_risk_completion {
        reasons.push(format!(
            "Low completion ({}%) in {}",
            record.completion_rate, record.course_title
        ));
    }
    if record.is_assessed() && record.post_assessment_score < thresholds.at_risk_score {
        reasons.push(format!(
            "Low post-assessment score ({}) in {}",
            record.post_assessment_score, record.course_title
        ));
    }
    reasons
}

/// Trainees, keyed by name, with at least one flagged record.
pub fn at_risk_trainees(records: &[TrainingRecord], thresholds: &Thresholds) -> Vec<AtRiskTrainee> {
    let mut groups = OrderedGroups::new();

    for record in records {
        let reasons = risk_reasons(record, thresholds);
        if reasons.is_empty() {
            continue;
        }
        let entry = groups.entry_or_insert_with(&record.trainee_name, || AtRiskTrainee {
            name: record.trainee_name.clone(),
            email: record.email.clone(),
            branch: record.branch.clone(),
            supervisor: record.supervisor.clone(),
            reasons: Vec::new(),
        });
        entry.reasons.extend(reasons);
    }

    groups.into_vec().into_iter().map(|(_, trainee)| trainee).collect()
}

pub fn courses_needing_attention(
    records: &[TrainingRecord],
    thresholds: &Thresholds,
) -> Vec<CourseAttention> {
    struct Acc<'a> {
        completion: f64,
        count: usize,
        score: f64,
        scored: usize,
        learners: HashSet<&'a str>,
    }

    let mut groups = OrderedGroups::new();
    for record in records {
        let entry = groups.entry_or_insert_with(&record.course_title, || Acc {
            completion: 0.0,
            count: 0,
            score: 0.0,
            scored: 0,
            learners: HashSet::new(),
        });
        entry.completion += record.completion_rate;
        entry.count += 1;
        if record.is_assessed() {
            entry.score += record.post_assessment_score;
            entry.scored += 1;
        }
        entry.learners.insert(record.trainee_name.as_str());
    }

    groups
        .into_vec()
        .into_iter()
        .filter_map(|(course_title, acc)| {
            let avg_completion = round1(mean(acc.completion, acc.count));
            let avg_score = round1(mean(acc.score, acc.scored));
            let low_completion = avg_completion < thresholds.course_attention_completion;
            let low_score = avg_score > 0.0 && avg_score < thresholds.course_attention_score;
            if !(low_completion || low_score) {
                return None;
            }
            Some(CourseAttention {
                course_title,
                avg_completion,
                avg_score,
                learners: acc.learners.len(),
                records: acc.count,
                low_completion,
                low_score,
            })
        })
        .collect()
}

/// The three reports behind the actionable-insights view, computed under one
/// threshold set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionableInsights {
    pub at_risk: Vec<AtRiskTrainee>,
    pub courses: Vec<CourseAttention>,
    pub improvers: Vec<ImproverRanking>,
}

impl ActionableInsights {
    pub fn build(records: &[TrainingRecord], thresholds: &Thresholds) -> Self {
        Self {
            at_risk: at_risk_trainees(records, thresholds),
            courses: courses_needing_attention(records, thresholds),
            improvers: top_improvers(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_record;

    fn course(id: u32, name: &str, title: &str, completion: f64, score: f64) -> TrainingRecord {
        let mut record = sample_record(id, name);
        record.course_title = title.to_string();
        record.completion_rate = completion;
        record.post_assessment_score = score;
        record
    }

    #[test]
    fn flags_only_the_failing_course() {
        let records = vec![
            course(1, "Avery Lee", "Fire Drill", 20.0, 0.0),
            course(2, "Avery Lee", "Onboarding", 90.0, 0.0),
        ];
        let rows = at_risk_trainees(&records, &Thresholds::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Avery Lee");
        assert_eq!(rows[0].reasons.len(), 1);
        assert!(rows[0].reasons[0].contains("Fire Drill"));
        assert!(!rows[0].reasons[0].contains("Onboarding"));
    }

    #[test]
    fn unassessed_scores_never_flag() {
        let records = vec![course(1, "Avery Lee", "Fire Drill", 95.0, 0.0)];
        assert!(at_risk_trainees(&records, &Thresholds::default()).is_empty());
    }

    #[test]
    fn one_record_can_carry_both_reasons() {
        let records = vec![course(1, "Avery Lee", "Fire Drill", 10.0, 35.0)];
        let rows = at_risk_trainees(&records, &Thresholds::default());
        assert_eq!(
            rows[0].reasons,
            vec![
                "Low completion (10%) in Fire Drill".to_string(),
                "Low post-assessment score (35) in Fire Drill".to_string(),
            ]
        );
    }

    #[test]
    fn trainees_without_email_are_still_flagged() {
        let mut record = course(1, "Avery Lee", "Fire Drill", 5.0, 0.0);
        record.email = String::new();
        let rows = at_risk_trainees(&[record], &Thresholds::default());
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn thresholds_shift_the_cutoff() {
        let records = vec![course(1, "Avery Lee", "Fire Drill", 45.0, 0.0)];
        assert!(at_risk_trainees(&records, &Thresholds::default()).is_empty());
        let strict = Thresholds {
            at_risk_completion: 50.0,
            ..Thresholds::default()
        };
        assert_eq!(at_risk_trainees(&records, &strict).len(), 1);
    }

    #[test]
    fn courses_flagged_on_completion_or_score() {
        let records = vec![
            course(1, "Avery Lee", "Low Completion", 40.0, 0.0),
            course(2, "Jules Moreno", "Low Completion", 50.0, 0.0),
            course(3, "Avery Lee", "Low Score", 90.0, 55.0),
            course(4, "Jules Moreno", "Low Score", 90.0, 0.0),
            course(5, "Avery Lee", "Healthy", 95.0, 88.0),
            course(6, "Kiara Patel", "Unscored", 75.0, 0.0),
        ];
        let rows = courses_needing_attention(&records, &Thresholds::default());
        let titles: Vec<&str> = rows.iter().map(|r| r.course_title.as_str()).collect();
        assert_eq!(titles, vec!["Low Completion", "Low Score"]);

        assert_eq!(rows[0].avg_completion, 45.0);
        assert_eq!(rows[0].avg_score, 0.0);
        assert!(rows[0].low_completion);
        assert!(!rows[0].low_score);
        assert_eq!(rows[0].learners, 2);

        assert_eq!(rows[1].avg_score, 55.0);
        assert!(rows[1].low_score);
        assert_eq!(rows[1].records, 2);
    }

    #[test]
    fn insights_bundle_handles_empty_input() {
        let insights = ActionableInsights::build(&[], &Thresholds::default());
        assert!(insights.at_risk.is_empty());
        assert!(insights.courses.is_empty());
        assert!(insights.improvers.is_empty());
    }
}
