use std::collections::{BTreeMap, HashSet};

use crate::filter::{select_group, ComparisonField};
use crate::models::{CourseTypeCount, GroupAverages, GroupComparison, GroupKpis, TrainingRecord};
use crate::stats::{mean, OrderedGroups};

pub fn course_averages(records: &[TrainingRecord]) -> Vec<GroupAverages> {
    averages_by(records, |record| Some(record.course_title.as_str()))
}

pub fn branch_averages(records: &[TrainingRecord]) -> Vec<GroupAverages> {
    averages_by(records, |record| {
        Some(record.branch.as_str()).filter(|branch| !branch.is_empty())
    })
}

/// Unrounded means of completion rate and average quiz score per key, in
/// first-seen order. Records whose key is `None` are skipped.
fn averages_by<F>(records: &[TrainingRecord], key: F) -> Vec<GroupAverages>
where
    F: Fn(&TrainingRecord) -> Option<&str>,
{
    let mut groups: OrderedGroups<(f64, f64, usize)> = OrderedGroups::new();
    for record in records {
        let Some(value) = key(record) else {
            continue;
        };
        let entry = groups.entry_or_insert_with(value, || (0.0, 0.0, 0));
        entry.0 += record.completion_rate;
        entry.1 += record.average_quiz_score;
        entry.2 += 1;
    }

    groups
        .into_vec()
        .into_iter()
        .map(|(name, (completion, quiz, count))| GroupAverages {
            name,
            avg_completion: mean(completion, count),
            avg_quiz_score: mean(quiz, count),
            records: count,
        })
        .collect()
}

/// Distinct record ids per course type.
pub fn course_type_counts(records: &[TrainingRecord]) -> Vec<CourseTypeCount> {
    let mut ids = BTreeMap::new();
    for record in records {
        ids.entry(record.course_type)
            .or_insert_with(HashSet::new)
            .insert(record.id);
    }

    ids.into_iter()
        .map(|(course_type, ids)| CourseTypeCount {
            course_type,
            count: ids.len(),
        })
        .collect()
}

/// Headline KPIs for one subset of records.
///
/// The improvement figure compares summed post scores against summed pre
/// scores over assessed records; it is not an average of per-record gains.
pub fn group_kpis(records: &[TrainingRecord]) -> GroupKpis {
    if records.is_empty() {
        return GroupKpis::default();
    }

    let trainees: HashSet<&str> = records.iter().map(|r| r.trainee_name.as_str()).collect();
    let completion: f64 = records.iter().map(|r| r.completion_rate).sum();
    let total_hours: f64 = records.iter().map(|r| r.training_hours).sum();

    let mut post_total = 0.0;
    let mut pre_total = 0.0;
    let mut assessed = 0usize;
    for record in records.iter().filter(|r| r.is_assessed()) {
        post_total += record.post_assessment_score;
        pre_total += record.pre_assessment_score;
        assessed += 1;
    }

    let improvement_pct = if pre_total > 0.0 {
        (post_total - pre_total) / pre_total * 100.0
    } else {
        0.0
    };

    GroupKpis {
        trainees: trainees.len(),
        avg_completion: mean(completion, records.len()),
        avg_score: mean(post_total, assessed),
        improvement_pct,
        total_hours,
    }
}

pub fn compare_groups(
    records: &[TrainingRecord],
    field: ComparisonField,
    left_value: &str,
    right_value: &str,
) -> GroupComparison {
    let left = select_group(records, field, left_value);
    let right = select_group(records, field, right_value);

    GroupComparison {
        field: field.to_string(),
        left_value: left_value.to_string(),
        right_value: right_value.to_string(),
        left: group_kpis(&left),
        right: group_kpis(&right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_record, CourseType};

    #[test]
    fn averages_use_quiz_not_post_scores() {
        let mut first = sample_record(1, "Avery Lee");
        first.completion_rate = 80.0;
        first.average_quiz_score = 70.0;
        first.post_assessment_score = 10.0;
        let mut second = sample_record(2, "Jules Moreno");
        second.completion_rate = 65.0;
        second.average_quiz_score = 75.0;
        let mut other = sample_record(3, "Kiara Patel");
        other.course_title = "Ethics".to_string();
        other.branch = "South".to_string();

        let courses = course_averages(&[first.clone(), second.clone(), other.clone()]);
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].name, "Workplace Safety");
        assert_eq!(courses[0].avg_completion, 72.5);
        assert_eq!(courses[0].avg_quiz_score, 72.5);
        assert_eq!(courses[0].records, 2);

        let branches = branch_averages(&[first, second, other]);
        assert_eq!(branches[0].name, "North");
        assert_eq!(branches[1].name, "South");
    }

    #[test]
    fn untitled_course_keeps_its_own_group() {
        let mut untitled = sample_record(1, "A");
        untitled.course_title = String::new();
        untitled.branch = String::new();
        let mut ethics = sample_record(2, "B");
        ethics.course_title = "Ethics".to_string();
        let records = vec![untitled, ethics];

        let averages = course_averages(&records);
        let courses: Vec<(&str, usize)> = averages
            .iter()
            .map(|g| (g.name.as_str(), g.records))
            .collect();
        assert_eq!(courses, vec![("", 1), ("Ethics", 1)]);

        let branches = branch_averages(&records);
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].records, 1);
    }

    #[test]
    fn averages_are_not_rounded() {
        let mut records = vec![sample_record(1, "A"), sample_record(2, "B"), sample_record(3, "C")];
        records[0].completion_rate = 10.0;
        records[1].completion_rate = 10.0;
        records[2].completion_rate = 11.0;
        let courses = course_averages(&records);
        assert!((courses[0].avg_completion - 31.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn course_types_count_distinct_ids() {
        let mut records = vec![sample_record(1, "A"), sample_record(2, "B"), sample_record(3, "C")];
        records[2].course_type = CourseType::Optional;
        let counts = course_type_counts(&records);
        assert_eq!(
            counts,
            vec![
                CourseTypeCount {
                    course_type: CourseType::Mandatory,
                    count: 2
                },
                CourseTypeCount {
                    course_type: CourseType::Optional,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn improvement_uses_summed_scores() {
        let mut first = sample_record(1, "Avery Lee");
        first.pre_assessment_score = 20.0;
        first.post_assessment_score = 40.0;
        let mut second = sample_record(2, "Jules Moreno");
        second.pre_assessment_score = 80.0;
        second.post_assessment_score = 80.0;
        let mut unassessed = sample_record(3, "Kiara Patel");
        unassessed.pre_assessment_score = 50.0;

        let kpis = group_kpis(&[first, second, unassessed]);
        // (120 - 100) / 100, where per-record averaging would give 50%
        assert!((kpis.improvement_pct - 20.0).abs() < 1e-9);
        assert_eq!(kpis.avg_score, 60.0);
        assert_eq!(kpis.trainees, 3);
        assert_eq!(kpis.total_hours, 3.0);
    }

    #[test]
    fn empty_subset_is_all_zero() {
        assert_eq!(group_kpis(&[]), GroupKpis::default());
        let comparison = compare_groups(&[], ComparisonField::Branch, "North", "South");
        assert_eq!(comparison.left, GroupKpis::default());
        assert_eq!(comparison.right, GroupKpis::default());
    }

    #[test]
    fn compares_two_supervisors() {
        let mut first = sample_record(1, "Avery Lee");
        first.supervisor = "Riley Chen".to_string();
        first.completion_rate = 40.0;
        first.training_hours = 2.5;
        let second = sample_record(2, "Jules Moreno");

        let comparison =
            compare_groups(&[first, second], ComparisonField::Supervisor, "Riley Chen", "Sam Ortiz");
        assert_eq!(comparison.field, "supervisor");
        assert_eq!(comparison.left.avg_completion, 40.0);
        assert_eq!(comparison.left.total_hours, 2.5);
        assert_eq!(comparison.right.avg_completion, 100.0);
        assert_eq!(comparison.right.trainees, 1);
    }
}
