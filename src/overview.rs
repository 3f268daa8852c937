use std::collections::HashSet;

use crate::models::{CourseType, OverviewKpis, TrainingRecord};
use crate::stats::mean;

/// Headline figures for the overview cards.
///
/// `trainees` counts distinct names while `learners` counts distinct non-empty
/// emails, so the two differ when some rows have no email.
pub fn overview(records: &[TrainingRecord]) -> OverviewKpis {
    if records.is_empty() {
        return OverviewKpis::default();
    }

    let mut trainees = HashSet::new();
    let mut learners = HashSet::new();
    let mut courses = HashSet::new();
    let mut completion = 0.0;
    let mut score = 0.0;
    let mut assessed = 0usize;
    let mut total_hours = 0.0;
    let mut mandatory = 0usize;

    for record in records {
        trainees.insert(record.trainee_name.as_str());
        if !record.email.is_empty() {
            learners.insert(record.email.as_str());
        }
        if !record.course_title.is_empty() {
            courses.insert(record.course_title.as_str());
        }
        completion += record.completion_rate;
        total_hours += record.training_hours;
        if record.is_assessed() {
            score += record.post_assessment_score;
            assessed += 1;
        }
        if record.course_type == CourseType::Mandatory {
            mandatory += 1;
        }
    }

    OverviewKpis {
        records: records.len(),
        trainees: trainees.len(),
        learners: learners.len(),
        courses: courses.len(),
        avg_completion: mean(completion, records.len()),
        avg_score: mean(score, assessed),
        assessed,
        total_hours,
        mandatory,
        optional: records.len() - mandatory,
    }
}
