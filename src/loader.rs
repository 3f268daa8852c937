use std::io;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{CourseType, TrainingRecord};
use crate::store::RecordStore;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%b %d, %Y", "%B %d, %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    #[serde(rename = "Trainee Name")]
    trainee_name: Option<String>,
    #[serde(rename = "Email")]
    email: Option<String>,
    #[serde(rename = "Branch")]
    branch: Option<String>,
    #[serde(rename = "District Head")]
    district_head: Option<String>,
    #[serde(rename = "Supervisor")]
    supervisor: Option<String>,
    #[serde(rename = "Course Title")]
    course_title: Option<String>,
    #[serde(rename = "Completion Rate")]
    completion_rate: Option<String>,
    #[serde(rename = "Pre-Assessment Score")]
    pre_assessment_score: Option<String>,
    #[serde(rename = "Post-Assessment Score")]
    post_assessment_score: Option<String>,
    #[serde(rename = "Average Quiz Score")]
    average_quiz_score: Option<String>,
    #[serde(rename = "Course Type")]
    course_type: Option<String>,
    #[serde(rename = "Completion Date")]
    completion_date: Option<String>,
    #[serde(rename = "Training Hours")]
    training_hours: Option<String>,
}

/// Reads records from CSV, assigning ids 1..N in row order. `today` replaces
/// any completion date that cannot be parsed.
pub fn load_records<R: io::Read>(reader: R, today: NaiveDate) -> Result<Vec<TrainingRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<RawRow>().enumerate() {
        let row = result?;
        let id = idx as u32 + 1;

        let completion_date = match parse_date(row.completion_date.as_deref()) {
            Some(date) => date,
            None => {
                warn!(
                    id,
                    raw = row.completion_date.as_deref().unwrap_or(""),
                    "unparseable completion date, using load date"
                );
                today
            }
        };

        records.push(TrainingRecord {
            id,
            trainee_name: text(row.trainee_name),
            email: text(row.email),
            branch: text(row.branch),
            district_head: text(row.district_head),
            supervisor: text(row.supervisor),
            course_title: text(row.course_title),
            completion_rate: parse_number(row.completion_rate.as_deref()),
            pre_assessment_score: parse_number(row.pre_assessment_score.as_deref()),
            post_assessment_score: parse_number(row.post_assessment_score.as_deref()),
            average_quiz_score: parse_number(row.average_quiz_score.as_deref()),
            course_type: CourseType::parse_lenient(row.course_type.as_deref().unwrap_or("")),
            completion_date,
            training_hours: parse_number(row.training_hours.as_deref()),
        });
    }

    Ok(records)
}

pub fn load_store(path: &Path) -> Result<RecordStore> {
    let file = std::fs::File::open(path)?;
    let records = load_records(file, Utc::now().date_naive())?;
    info!(records = records.len(), path = %path.display(), "loaded training records");
    RecordStore::new(records)
}

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Parses a numeric cell, tolerating a trailing percent sign and thousands
/// separators. Anything else maps to 0.
pub fn parse_number(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let cleaned = raw.trim().trim_end_matches('%').replace(',', "");
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|datetime| datetime.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Trainee Name,Email,Branch,District Head,Supervisor,Course Title,Completion Rate,Pre-Assessment Score,Post-Assessment Score,Average Quiz Score,Course Type,Completion Date,Training Hours\n";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn maps_a_well_formed_row() {
        let csv = format!(
            "{HEADER}Avery Lee,avery@example.com,North,Dana Cruz,Sam Ortiz,Fire Safety,85%,40,78,81.5,Mandatory,3/15/2024,2.5\n"
        );
        let records = load_records(csv.as_bytes(), today()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, 1);
        assert_eq!(record.trainee_name, "Avery Lee");
        assert_eq!(record.district_head, "Dana Cruz");
        assert_eq!(record.completion_rate, 85.0);
        assert_eq!(record.pre_assessment_score, 40.0);
        assert_eq!(record.post_assessment_score, 78.0);
        assert_eq!(record.average_quiz_score, 81.5);
        assert_eq!(record.course_type, CourseType::Mandatory);
        assert_eq!(record.completion_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(record.training_hours, 2.5);
    }

    #[test]
    fn bad_values_fall_back() {
        let csv = format!(
            "{HEADER}Jules Moreno,,South,,,Ethics,n/a,,abc,,elective,not a date,\n"
        );
        let records = load_records(csv.as_bytes(), today()).unwrap();
        let record = &records[0];
        assert_eq!(record.email, "");
        assert_eq!(record.completion_rate, 0.0);
        assert_eq!(record.post_assessment_score, 0.0);
        assert_eq!(record.course_type, CourseType::Optional);
        assert_eq!(record.completion_date, today());
        assert_eq!(record.training_hours, 0.0);
    }

    #[test]
    fn assigns_sequential_ids_and_tolerates_short_rows() {
        let csv = format!("{HEADER}A,a@x.com,North\nB,b@x.com,South,,,,50,,,,Optional,2024-01-02,1\n");
        let records = load_records(csv.as_bytes(), today()).unwrap();
        let ids: Vec<u32> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(records[0].completion_date, today());
        assert_eq!(records[1].completion_date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn parses_numbers_leniently() {
        assert_eq!(parse_number(Some(" 1,250.5 ")), 1250.5);
        assert_eq!(parse_number(Some("NaN")), 0.0);
        assert_eq!(parse_number(Some("")), 0.0);
        assert_eq!(parse_number(None), 0.0);
        assert_eq!(parse_number(Some("120")), 120.0);
    }

    #[test]
    fn parses_common_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_date(Some("2024-03-05")), expected);
        assert_eq!(parse_date(Some("3/5/2024")), expected);
        assert_eq!(parse_date(Some("Mar 5, 2024")), expected);
        assert_eq!(parse_date(Some("2024-03-05 14:30:00")), expected);
        assert_eq!(parse_date(Some("  ")), None);
        assert_eq!(parse_date(Some("2024-13-40")), None);
    }

    #[test]
    fn loads_a_store_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        std::fs::write(
            &path,
            format!("{HEADER}Avery Lee,avery@example.com,North,Dana Cruz,Sam Ortiz,Fire Safety,85,40,78,81,Mandatory,2024-03-15,2\n"),
        )
        .unwrap();
        let store = load_store(&path).unwrap();
        assert_eq!(store.len(), 1);
    }
}
