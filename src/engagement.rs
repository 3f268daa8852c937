use crate::models::{EngagementPoint, EngagementScatter, TrainingRecord};
use crate::stats::{mean, OrderedGroups};

/// Training hours against post-assessment score, one point per trainee name.
///
/// The score mean includes unassessed (zero) records, so learners with
/// ungraded courses are pulled down.
pub fn engagement_scatter(records: &[TrainingRecord]) -> EngagementScatter {
    let mut groups: OrderedGroups<(f64, f64, usize)> = OrderedGroups::new();
    for record in records {
        let entry = groups.entry_or_insert_with(&record.trainee_name, || (0.0, 0.0, 0));
        entry.0 += record.training_hours;
        entry.1 += record.post_assessment_score;
        entry.2 += 1;
    }

    let points: Vec<EngagementPoint> = groups
        .into_vec()
        .into_iter()
        .map(|(name, (hours, score, count))| EngagementPoint {
            name,
            total_hours: hours,
            avg_score: score / count as f64,
            records: count,
        })
        .filter(|point| point.avg_score.is_finite())
        .collect();

    let mean_hours = mean(points.iter().map(|p| p.total_hours).sum(), points.len());
    let mean_score = mean(points.iter().map(|p| p.avg_score).sum(), points.len());

    EngagementScatter {
        points,
        mean_hours,
        mean_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_record;

    #[test]
    fn zero_scores_pull_the_mean_down() {
        let mut graded = sample_record(1, "Avery Lee");
        graded.post_assessment_score = 90.0;
        graded.training_hours = 3.0;
        let mut ungraded = sample_record(2, "Avery Lee");
        ungraded.training_hours = 1.5;
        let mut other = sample_record(3, "Jules Moreno");
        other.post_assessment_score = 70.0;
        other.training_hours = 0.5;

        let scatter = engagement_scatter(&[graded, ungraded, other]);
        assert_eq!(scatter.points.len(), 2);
        assert_eq!(scatter.points[0].name, "Avery Lee");
        assert_eq!(scatter.points[0].total_hours, 4.5);
        assert_eq!(scatter.points[0].avg_score, 45.0);
        assert_eq!(scatter.points[0].records, 2);
        assert_eq!(scatter.mean_hours, 2.5);
        assert_eq!(scatter.mean_score, 57.5);
    }

    #[test]
    fn learners_are_keyed_by_name_not_email() {
        let mut first = sample_record(1, "Avery Lee");
        first.email = String::new();
        let second = sample_record(2, "Avery Lee");
        let scatter = engagement_scatter(&[first, second]);
        assert_eq!(scatter.points.len(), 1);
    }

    #[test]
    fn empty_input_has_zero_reference_lines() {
        let scatter = engagement_scatter(&[]);
        assert!(scatter.points.is_empty());
        assert_eq!(scatter.mean_hours, 0.0);
        assert_eq!(scatter.mean_score, 0.0);
    }
}
