use std::cmp::Ordering;
use std::collections::HashMap;

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean of a pre-summed total, zero when nothing was counted.
pub fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

pub fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Groups keyed by string that remember the order in which keys first
/// appeared, so sorts over the groups break ties by first appearance.
#[derive(Debug)]
pub struct OrderedGroups<V> {
    index: HashMap<String, usize>,
    groups: Vec<(String, V)>,
}

impl<V> Default for OrderedGroups<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }
}

impl<V> OrderedGroups<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_or_insert_with(&mut self, key: &str, init: impl FnOnce() -> V) -> &mut V {
        let idx = match self.index.get(key) {
            Some(idx) => *idx,
            None => {
                self.groups.push((key.to_string(), init()));
                self.index.insert(key.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx].1
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_vec(self) -> Vec<(String, V)> {
        self.groups
    }
}
