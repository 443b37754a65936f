// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;

use bijux_inspector_model::{SchemaColumnStat, SchemaScope};

/// Identity of one profiling run. Keys never match across datasets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaCacheKey {
    pub dataset_id: String,
    pub filter_hash: String,
    pub sample_size: usize,
    pub scope: SchemaScope,
}

struct CachedStats {
    stats: Arc<Vec<SchemaColumnStat>>,
    last_used: u64,
}

/// Bounded least-recently-used cache of computed schema stats.
pub struct SchemaCache {
    max_entries: usize,
    tick: u64,
    entries: HashMap<SchemaCacheKey, CachedStats>,
}

impl SchemaCache {
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
            tick: 0,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &SchemaCacheKey) -> Option<Arc<Vec<SchemaColumnStat>>> {
        self.tick += 1;
        let tick = self.tick;
        self.entries.get_mut(key).map(|e| {
            e.last_used = tick;
            Arc::clone(&e.stats)
        })
    }

    pub fn insert(&mut self, key: SchemaCacheKey, stats: Arc<Vec<SchemaColumnStat>>) {
        self.tick += 1;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(victim) = self
                .entries
                .iter()
                .min_by_key(|(_, v)| v.last_used)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(
            key,
            CachedStats {
                stats,
                last_used: self.tick,
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(dataset: &str, n: usize) -> SchemaCacheKey {
        SchemaCacheKey {
            dataset_id: dataset.to_string(),
            filter_hash: "none".to_string(),
            sample_size: n,
            scope: SchemaScope::Full,
        }
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = SchemaCache::new(2);
        cache.insert(key("ds_a", 1), Arc::new(Vec::new()));
        cache.insert(key("ds_a", 2), Arc::new(Vec::new()));
        assert!(cache.get(&key("ds_a", 1)).is_some());
        cache.insert(key("ds_a", 3), Arc::new(Vec::new()));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key("ds_a", 2)).is_none());
        assert!(cache.get(&key("ds_a", 1)).is_some());
        assert!(cache.get(&key("ds_a", 3)).is_some());
    }

    #[test]
    fn keys_are_scoped_per_dataset() {
        let mut cache = SchemaCache::new(8);
        cache.insert(key("ds_a", 10), Arc::new(Vec::new()));
        assert!(cache.get(&key("ds_b", 10)).is_none());
    }
}
