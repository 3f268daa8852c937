//! An empty selection on any dimension means "no restriction". Date bounds
//! are inclusive.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CourseType, TrainingRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl TimePeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pub branches: BTreeSet<String>,
    pub district_heads: BTreeSet<String>,
    pub supervisors: BTreeSet<String>,
    pub courses: BTreeSet<String>,
    pub course_types: BTreeSet<CourseType>,
    pub time_period: TimePeriod,
}

impl Filters {
    pub fn is_unrestricted(&self) -> bool {
        self.branches.is_empty()
            && self.district_heads.is_empty()
            && self.supervisors.is_empty()
            && self.courses.is_empty()
            && self.course_types.is_empty()
            && self.time_period.is_unbounded()
    }

    pub fn matches(&self, record: &TrainingRecord) -> bool {
        selected(&self.branches, &record.branch)
            && selected(&self.district_heads, &record.district_head)
            && selected(&self.supervisors, &record.supervisor)
            && selected(&self.courses, &record.course_title)
            && (self.course_types.is_empty() || self.course_types.contains(&record.course_type))
            && self.time_period.contains(record.completion_date)
    }
}

fn selected(selection: &BTreeSet<String>, value: &str) -> bool {
    selection.is_empty() || selection.contains(value)
}

/// Returns the records that pass `filters`, in input order.
pub fn apply_filters(records: &[TrainingRecord], filters: &Filters) -> Vec<TrainingRecord> {
    records
        .iter()
        .filter(|record| filters.matches(record))
        .cloned()
        .collect()
}

/// Distinct values available for each filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub branches: Vec<String>,
    pub district_heads: Vec<String>,
    pub supervisors: Vec<String>,
    pub courses: Vec<String>,
    pub course_types: Vec<CourseType>,
}

impl FilterOptions {
    pub fn from_records(records: &[TrainingRecord]) -> Self {
        let mut branches = BTreeSet::new();
        let mut district_heads = BTreeSet::new();
        let mut supervisors = BTreeSet::new();
        let mut courses = BTreeSet::new();
        let mut course_types = BTreeSet::new();

        for record in records {
            insert_non_empty(&mut branches, &record.branch);
            insert_non_empty(&mut district_heads, &record.district_head);
            insert_non_empty(&mut supervisors, &record.supervisor);
            insert_non_empty(&mut courses, &record.course_title);
            course_types.insert(record.course_type);
        }

        Self {
            branches: branches.into_iter().collect(),
            district_heads: district_heads.into_iter().collect(),
            supervisors: supervisors.into_iter().collect(),
            courses: courses.into_iter().collect(),
            course_types: course_types.into_iter().collect(),
        }
    }
}

fn insert_non_empty(set: &mut BTreeSet<String>, value: &str) {
    if !value.is_empty() {
        set.insert(value.to_string());
    }
}

/// Field a comparison subset is selected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonField {
    Branch,
    DistrictHead,
    Supervisor,
}

impl ComparisonField {
    pub fn value<'a>(&self, record: &'a TrainingRecord) -> &'a str {
        match self {
            ComparisonField::Branch => &record.branch,
            ComparisonField::DistrictHead => &record.district_head,
            ComparisonField::Supervisor => &record.supervisor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonField::Branch => "branch",
            ComparisonField::DistrictHead => "district-head",
            ComparisonField::Supervisor => "supervisor",
        }
    }
}

impl fmt::Display for ComparisonField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "branch" => Ok(ComparisonField::Branch),
            "district-head" | "districthead" => Ok(ComparisonField::DistrictHead),
            "supervisor" => Ok(ComparisonField::Supervisor),
            other => Err(format!(
                "unknown comparison field '{other}' (expected branch, district-head or supervisor)"
            )),
        }
    }
}

/// Records whose `field` equals `value` exactly.
pub fn select_group(
    records: &[TrainingRecord],
    field: ComparisonField,
    value: &str,
) -> Vec<TrainingRecord> {
    records
        .iter()
        .filter(|record| field.value(record) == value)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_record;

    fn records() -> Vec<TrainingRecord> {
        let mut first = sample_record(1, "Avery Lee");
        first.branch = "North".to_string();
        first.completion_date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

        let mut second = sample_record(2, "Jules Moreno");
        second.branch = "South".to_string();
        second.course_type = CourseType::Optional;
        second.completion_date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();

        let mut third = sample_record(3, "Kiara Patel");
        third.branch = "North".to_string();
        third.supervisor = "Riley Chen".to_string();
        third.completion_date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        vec![first, second, third]
    }

    #[test]
    fn empty_filters_pass_everything_in_order() {
        let input = records();
        let filters = Filters::default();
        assert!(filters.is_unrestricted());
        assert_eq!(apply_filters(&input, &filters), input);
    }

    #[test]
    fn selections_are_conjunctive() {
        let filters = Filters {
            branches: BTreeSet::from(["North".to_string()]),
            supervisors: BTreeSet::from(["Riley Chen".to_string()]),
            ..Filters::default()
        };
        let filtered = apply_filters(&records(), &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 3);
    }

    #[test]
    fn course_type_selection() {
        let filters = Filters {
            course_types: BTreeSet::from([CourseType::Optional]),
            ..Filters::default()
        };
        let ids: Vec<u32> = apply_filters(&records(), &filters)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn date_bounds_are_inclusive_and_optional() {
        let bounded = Filters {
            time_period: TimePeriod {
                start: NaiveDate::from_ymd_opt(2024, 2, 10),
                end: NaiveDate::from_ymd_opt(2024, 3, 10),
            },
            ..Filters::default()
        };
        let ids: Vec<u32> = apply_filters(&records(), &bounded)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);

        let open_start = Filters {
            time_period: TimePeriod {
                start: None,
                end: NaiveDate::from_ymd_opt(2024, 1, 31),
            },
            ..Filters::default()
        };
        let ids: Vec<u32> = apply_filters(&records(), &open_start)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn options_are_sorted_and_skip_empty_values() {
        let mut input = records();
        input[1].supervisor = String::new();
        let options = FilterOptions::from_records(&input);
        assert_eq!(options.branches, vec!["North", "South"]);
        assert_eq!(options.supervisors, vec!["Riley Chen", "Sam Ortiz"]);
        assert_eq!(
            options.course_types,
            vec![CourseType::Mandatory, CourseType::Optional]
        );
    }

    #[test]
    fn comparison_field_parses_and_selects() {
        let field: ComparisonField = "district_head".parse().unwrap();
        assert_eq!(field, ComparisonField::DistrictHead);
        assert!("region".parse::<ComparisonField>().is_err());

        let north = select_group(&records(), ComparisonField::Branch, "North");
        assert_eq!(north.len(), 2);
        assert!(select_group(&records(), ComparisonField::Branch, "East").is_empty());
    }
}
