// SPDX-License-Identifier: Apache-2.0

use bijux_inspector_model::{Dataset, DatasetId, DatasetQueryInput};

/// Loaded datasets in load order plus the active one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetRegistry {
    datasets: Vec<Dataset>,
    active: Option<DatasetId>,
}

impl DatasetRegistry {
    /// Replaces a dataset with the same id in place, otherwise appends. The
    /// upserted dataset becomes active.
    pub fn upsert(&mut self, dataset: Dataset) {
        self.active = Some(dataset.id.clone());
        if let Some(slot) = self.datasets.iter_mut().find(|d| d.id == dataset.id) {
            *slot = dataset;
        } else {
            self.datasets.push(dataset);
        }
    }

    /// Removes a dataset; returns it and whether it was the active one.
    pub fn remove(&mut self, id: &DatasetId) -> Option<(Dataset, bool)> {
        let at = self.datasets.iter().position(|d| &d.id == id)?;
        let removed = self.datasets.remove(at);
        let was_active = self.active.as_ref() == Some(id);
        if was_active {
            self.active = None;
        }
        Some((removed, was_active))
    }

    #[must_use]
    pub fn get(&self, id: &DatasetId) -> Option<&Dataset> {
        self.datasets.iter().find(|d| &d.id == id)
    }

    #[must_use]
    pub fn active(&self) -> Option<&Dataset> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&DatasetId> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Dataset> {
        self.datasets.first()
    }

    #[must_use]
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Source descriptors for a cross-dataset query, in load order.
    #[must_use]
    pub fn query_inputs(&self) -> Vec<DatasetQueryInput> {
        self.datasets
            .iter()
            .map(|d| DatasetQueryInput {
                dataset_id: d.id.clone(),
                label: d.label.clone(),
                has_headers: d.has_headers,
                source: d.source.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bijux_inspector_model::{ColType, DatasetSource};

    fn dataset(text: &str, label: &str) -> Dataset {
        let source = DatasetSource::Text {
            text: text.to_string(),
        };
        let headers = vec!["a".to_string()];
        Dataset {
            id: DatasetId::derive(&source, &headers, 1),
            label: label.to_string(),
            has_headers: true,
            headers,
            col_types: vec![ColType::String],
            row_count: 1,
            source,
        }
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut reg = DatasetRegistry::default();
        reg.upsert(dataset("a\n1", "first"));
        reg.upsert(dataset("a\n2", "second"));
        reg.upsert(dataset("a\n1", "renamed"));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.datasets()[0].label, "renamed");
        assert_eq!(reg.active().map(|d| d.label.as_str()), Some("renamed"));
    }

    #[test]
    fn removing_active_clears_it() {
        let mut reg = DatasetRegistry::default();
        let a = dataset("a\n1", "a");
        let b = dataset("a\n2", "b");
        reg.upsert(a.clone());
        reg.upsert(b.clone());
        let (_, was_active) = reg.remove(&b.id).expect("present");
        assert!(was_active);
        assert!(reg.active().is_none());
        assert_eq!(reg.first().map(|d| d.id.clone()), Some(a.id.clone()));
        let (_, was_active) = reg.remove(&a.id).expect("present");
        assert!(!was_active);
        assert!(reg.remove(&a.id).is_none());
    }
}
