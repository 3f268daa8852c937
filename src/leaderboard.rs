use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{CourseRanking, GroupRanking, ImproverRanking, TraineeRanking, TrainingRecord};
use crate::stats::{descending, mean, round1, OrderedGroups};

pub const TOP_COURSES: usize = 5;

/// Average post-assessment score per learner, keyed by email.
///
/// Records without an email or without a completed assessment are skipped.
pub fn top_trainees(records: &[TrainingRecord]) -> Vec<TraineeRanking> {
    struct Acc {
        name: String,
        branch: String,
        total: f64,
        count: usize,
    }

    let mut groups = OrderedGroups::new();
    for record in records {
        if record.email.is_empty() || !record.is_assessed() {
            continue;
        }
        let entry = groups.entry_or_insert_with(&record.email, || Acc {
            name: record.trainee_name.clone(),
            branch: record.branch.clone(),
            total: 0.0,
            count: 0,
        });
        entry.total += record.post_assessment_score;
        entry.count += 1;
    }

    let mut rows: Vec<TraineeRanking> = groups
        .into_vec()
        .into_iter()
        .map(|(email, acc)| TraineeRanking {
            rank: 0,
            name: acc.name,
            email,
            branch: acc.branch,
            avg_score: round1(mean(acc.total, acc.count)),
            assessments: acc.count,
        })
        .collect();

    rows.sort_by(|a, b| descending(a.avg_score, b.avg_score));
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}

pub fn top_branches(records: &[TrainingRecord]) -> Vec<GroupRanking> {
    rank_by_completion(records, |record| &record.branch)
}

pub fn top_supervisors(records: &[TrainingRecord]) -> Vec<GroupRanking> {
    rank_by_completion(records, |record| &record.supervisor)
}

fn rank_by_completion<F>(records: &[TrainingRecord], key: F) -> Vec<GroupRanking>
where
    F: Fn(&TrainingRecord) -> &str,
{
    struct Acc<'a> {
        total: f64,
        count: usize,
        trainees: HashSet<&'a str>,
    }

    let mut groups = OrderedGroups::new();
    for record in records {
        let value = key(record);
        if value.is_empty() {
            continue;
        }
        let entry = groups.entry_or_insert_with(value, || Acc {
            total: 0.0,
            count: 0,
            trainees: HashSet::new(),
        });
        entry.total += record.completion_rate;
        entry.count += 1;
        entry.trainees.insert(record.trainee_name.as_str());
    }

    let mut rows: Vec<GroupRanking> = groups
        .into_vec()
        .into_iter()
        .map(|(name, acc)| GroupRanking {
            rank: 0,
            name,
            avg_rate: round1(mean(acc.total, acc.count)),
            trainees: acc.trainees.len(),
            records: acc.count,
        })
        .collect();

    rows.sort_by(|a, b| descending(a.avg_rate, b.avg_rate));
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}

/// Mean positive pre-to-post improvement per learner, keyed by email.
///
/// Only records with both scores recorded qualify, and only improvements
/// above zero are averaged. Learners with no positive improvement are left out.
pub fn top_improvers(records: &[TrainingRecord]) -> Vec<ImproverRanking> {
    struct Acc {
        name: String,
        total: f64,
        count: usize,
    }

    let mut groups = OrderedGroups::new();
    for record in records {
        if record.email.is_empty()
            || record.pre_assessment_score <= 0.0
            || record.post_assessment_score <= 0.0
        {
            continue;
        }
        let entry = groups.entry_or_insert_with(&record.email, || Acc {
            name: record.trainee_name.clone(),
            total: 0.0,
            count: 0,
        });
        let improvement = (record.post_assessment_score - record.pre_assessment_score)
            / record.pre_assessment_score
            * 100.0;
        if improvement > 0.0 {
            entry.total += improvement;
            entry.count += 1;
        }
    }

    let mut rows: Vec<ImproverRanking> = groups
        .into_vec()
        .into_iter()
        .filter(|(_, acc)| acc.count > 0)
        .map(|(email, acc)| ImproverRanking {
            rank: 0,
            name: acc.name,
            email,
            avg_improvement: round1(mean(acc.total, acc.count)),
            improvements: acc.count,
        })
        .collect();

    rows.sort_by(|a, b| descending(a.avg_improvement, b.avg_improvement));
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}

/// Courses ranked by `0.6 * avg_completion + 0.4 * avg_score`, top five.
pub fn top_courses(records: &[TrainingRecord]) -> Vec<CourseRanking> {
    #[derive(Default)]
    struct Acc {
        completion: f64,
        count: usize,
        score: f64,
        scored: usize,
    }

    let mut groups: OrderedGroups<Acc> = OrderedGroups::new();
    for record in records {
        let entry = groups.entry_or_insert_with(&record.course_title, Acc::default);
        entry.completion += record.completion_rate;
        entry.count += 1;
        if record.is_assessed() {
            entry.score += record.post_assessment_score;
            entry.scored += 1;
        }
    }

    let mut rows: Vec<CourseRanking> = groups
        .into_vec()
        .into_iter()
        .map(|(course_title, acc)| {
            let avg_completion = mean(acc.completion, acc.count);
            let avg_score = mean(acc.score, acc.scored);
            CourseRanking {
                rank: 0,
                course_title,
                avg_completion,
                avg_score,
                performance_score: avg_completion * 0.6 + avg_score * 0.4,
                records: acc.count,
            }
        })
        .collect();

    rows.sort_by(|a, b| descending(a.performance_score, b.performance_score));
    rows.truncate(TOP_COURSES);
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub trainees: Vec<TraineeRanking>,
    pub branches: Vec<GroupRanking>,
    pub supervisors: Vec<GroupRanking>,
}

impl Leaderboard {
    pub fn build(records: &[TrainingRecord]) -> Self {
        Self {
            trainees: top_trainees(records),
            branches: top_branches(records),
            supervisors: top_supervisors(records),
        }
    }
}
