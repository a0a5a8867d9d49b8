//! Aggregation helpers shared by the pipelines
//!
//! Everything here resolves ties deterministically in favour of the value
//! seen first in input order.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::AddAssign;

/// Keyed accumulator that remembers the order in which keys first appeared
///
/// Serializes as a JSON object whose keys follow first-seen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tally<V> {
    entries: Vec<(String, V)>,
}

impl<V> Tally<V>
where
    V: AddAssign + Default + Copy + PartialOrd,
{
    pub fn new() -> Self {
        Tally {
            entries: Vec::new(),
        }
    }

    /// Add `amount` to the entry for `key`, creating it at the end if unseen
    pub fn add(&mut self, key: &str, amount: V) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, value)) => *value += amount,
            None => {
                let mut value = V::default();
                value += amount;
                self.entries.push((key.to_string(), value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, V)> {
        self.entries.iter().map(|(k, value)| (k.as_str(), *value))
    }

    /// Key with the largest value; among equal values the first-seen key wins
    pub fn mode(&self) -> Option<&str> {
        let mut best: Option<(&str, V)> = None;
        for (key, value) in self.iter() {
            match best {
                Some((_, top)) if value <= top => {}
                _ => best = Some((key, value)),
            }
        }
        best.map(|(key, _)| key)
    }
}

impl Tally<u64> {
    /// Count one occurrence of `key`
    pub fn count(&mut self, key: &str) {
        self.add(key, 1);
    }
}

impl<V: Serialize> Serialize for Tally<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// First element holding the maximum key
pub fn first_max_by<T, F>(items: &[T], key: F) -> Option<&T>
where
    F: Fn(&T) -> f64,
{
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let k = key(item);
        match best {
            Some((_, top)) if k <= top => {}
            _ => best = Some((item, k)),
        }
    }
    best.map(|(item, _)| item)
}

/// First element holding the minimum key
pub fn first_min_by<T, F>(items: &[T], key: F) -> Option<&T>
where
    F: Fn(&T) -> f64,
{
    first_max_by(items, |item| -key(item))
}

/// `round(sum / count)` with halves rounded away from zero; zero when `count` is zero
pub fn rounded_average(sum: f64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    (sum / count as f64).round() as i64
}
