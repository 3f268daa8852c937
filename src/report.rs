use std::fmt::Write;

use crate::filter::Filters;
use crate::pipeline::DashboardSnapshot;
use crate::table::TableRow;
use crate::thresholds::Thresholds;

/// Renders rows as a Markdown table, at most `limit` rows.
pub fn markdown_table<'a, R, I>(rows: I, limit: usize) -> String
where
    R: TableRow + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut output = String::new();
    let columns = R::columns();

    let labels: Vec<&str> = columns.iter().map(|c| c.label).collect();
    let _ = writeln!(output, "| {} |", labels.join(" | "));
    let _ = writeln!(output, "|{}", "---|".repeat(columns.len()));
    for row in rows.into_iter().take(limit) {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| row.cell(c.key).display().replace('|', "\\|"))
            .collect();
        let _ = writeln!(output, "| {} |", cells.join(" | "));
    }
    output
}

fn describe_filters(filters: &Filters) -> String {
    if filters.is_unrestricted() {
        return "all records".to_string();
    }

    let mut parts = Vec::new();
    let mut push = |label: &str, values: Vec<String>| {
        if !values.is_empty() {
            parts.push(format!("{label}: {}", values.join(", ")));
        }
    };
    push("branch", filters.branches.iter().cloned().collect());
    push("district head", filters.district_heads.iter().cloned().collect());
    push("supervisor", filters.supervisors.iter().cloned().collect());
    push("course", filters.courses.iter().cloned().collect());
    push(
        "course type",
        filters.course_types.iter().map(|t| t.to_string()).collect(),
    );

    let period = filters.time_period;
    match (period.start, period.end) {
        (Some(start), Some(end)) => parts.push(format!("{start} to {end}")),
        (Some(start), None) => parts.push(format!("from {start}")),
        (None, Some(end)) => parts.push(format!("until {end}")),
        (None, None) => {}
    }
    parts.join("; ")
}

pub fn build_report(snapshot: &DashboardSnapshot, filters: &Filters, thresholds: &Thresholds) -> String {
    let mut output = String::new();
    let overview = &snapshot.overview;

    let _ = writeln!(output, "# Training Completion Report");
    let _ = writeln!(output, "Generated for {}", describe_filters(filters));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");

    if overview.records == 0 {
        let _ = writeln!(output, "No training records match these filters.");
        return output;
    }

    let _ = writeln!(
        output,
        "- {} records across {} trainees ({} with email) and {} courses",
        overview.records, overview.trainees, overview.learners, overview.courses
    );
    let _ = writeln!(output, "- Average completion {:.1}%", overview.avg_completion);
    let _ = writeln!(
        output,
        "- Average post-assessment score {:.1} over {} assessments",
        overview.avg_score, overview.assessed
    );
    let _ = writeln!(output, "- {:.1} training hours logged", overview.total_hours);
    let _ = writeln!(
        output,
        "- {} mandatory / {} optional enrolments",
        overview.mandatory, overview.optional
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Trainees");
    if snapshot.leaderboard.trainees.is_empty() {
        let _ = writeln!(output, "No completed assessments in this window.");
    } else {
        output.push_str(&markdown_table(&snapshot.leaderboard.trainees, 10));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Branches");
    output.push_str(&markdown_table(&snapshot.leaderboard.branches, 10));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Supervisors");
    output.push_str(&markdown_table(&snapshot.leaderboard.supervisors, 10));

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## At-Risk Trainees (completion < {}%, score < {})",
        thresholds.at_risk_completion, thresholds.at_risk_score
    );
    if snapshot.insights.at_risk.is_empty() {
        let _ = writeln!(output, "No trainees below the at-risk thresholds.");
    } else {
        for trainee in &snapshot.insights.at_risk {
            let _ = writeln!(output, "- {}: {}", trainee.name, trainee.reasons.join("; "));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Courses Needing Attention");
    if snapshot.insights.courses.is_empty() {
        let _ = writeln!(output, "All courses meet the attention thresholds.");
    } else {
        output.push_str(&markdown_table(&snapshot.insights.courses, usize::MAX));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Improvers");
    if snapshot.insights.improvers.is_empty() {
        let _ = writeln!(output, "No pre/post assessment improvements recorded.");
    } else {
        output.push_str(&markdown_table(&snapshot.insights.improvers, 10));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Performing Courses");
    output.push_str(&markdown_table(&snapshot.top_courses, usize::MAX));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Monthly Trend");
    for trend in &snapshot.trends {
        let moving = trend
            .moving_average
            .map(|value| format!("{value:.1}%"))
            .unwrap_or_else(|| "n/a".to_string());
        let _ = writeln!(
            output,
            "- {}: {:.1}% completion (3-month avg {}), {:.1} hours",
            trend.label, trend.avg_completion, moving, trend.total_hours
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Engagement");
    let _ = writeln!(
        output,
        "{} trainees average {:.1} training hours and a {:.1} post-assessment score.",
        snapshot.engagement.points.len(),
        snapshot.engagement.mean_hours,
        snapshot.engagement.mean_score
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_record, CourseType};
    use crate::pipeline::Dashboard;
    use crate::store::RecordStore;
    use std::collections::BTreeSet;

    #[test]
    fn empty_snapshot_renders_a_notice() {
        let report = build_report(
            &DashboardSnapshot::default(),
            &Filters::default(),
            &Thresholds::default(),
        );
        assert!(report.contains("Generated for all records"));
        assert!(report.contains("No training records match these filters."));
        assert!(!report.contains("## Top Trainees"));
    }

    #[test]
    fn report_lists_at_risk_reasons() {
        let mut record = sample_record(1, "Avery Lee");
        record.completion_rate = 15.0;
        let dashboard = Dashboard::new(RecordStore::new(vec![record]).unwrap());
        let report = build_report(&dashboard.snapshot(), dashboard.filters(), dashboard.thresholds());
        assert!(report.contains("- Avery Lee: Low completion (15%) in Workplace Safety"));
        assert!(report.contains("## Courses Needing Attention"));
    }

    #[test]
    fn filters_are_described() {
        let filters = Filters {
            branches: BTreeSet::from(["North".to_string(), "South".to_string()]),
            course_types: BTreeSet::from([CourseType::Optional]),
            ..Filters::default()
        };
        assert_eq!(
            describe_filters(&filters),
            "branch: North, South; course type: Optional"
        );
    }

    #[test]
    fn markdown_table_escapes_pipes() {
        let mut record = sample_record(1, "A | B");
        record.email = String::new();
        let table = markdown_table(&[record], 5);
        assert!(table.contains("A \\| B"));
        assert_eq!(table.lines().count(), 3);
    }
}
