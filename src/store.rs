use std::collections::HashSet;

use crate::error::{InsightsError, Result};
use crate::models::TrainingRecord;

/// The full, unfiltered dataset for one load. Never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<TrainingRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<TrainingRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(InsightsError::DuplicateRecordId(record.id));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[TrainingRecord] {
        &self.records
    }

    pub fn get(&self, id: u32) -> Option<&TrainingRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_record;

    #[test]
    fn keeps_load_order() {
        let store = RecordStore::new(vec![
            sample_record(2, "Jules Moreno"),
            sample_record(1, "Avery Lee"),
        ])
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].trainee_name, "Jules Moreno");
        assert_eq!(store.get(1).map(|r| r.trainee_name.as_str()), Some("Avery Lee"));
        assert!(store.get(9).is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = RecordStore::new(vec![
            sample_record(1, "Avery Lee"),
            sample_record(1, "Kiara Patel"),
        ]);
        assert!(matches!(result, Err(InsightsError::DuplicateRecordId(1))));
    }

    #[test]
    fn empty_store_is_valid() {
        let store = RecordStore::new(Vec::new()).unwrap();
        assert!(store.is_empty());
    }
}
