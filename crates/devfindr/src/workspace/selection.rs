use crate::contracts::{CmaComp, ParcelSummary};

/// Ordered, id-keyed set of comparables chosen in the CMA studio.
///
/// Every effective mutation bumps `revision`, which keys the valuation memo.
#[derive(Debug, Clone, Default)]
pub struct CompSelection {
    items: Vec<ParcelSummary>,
    revision: u64,
}

impl CompSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `parcel` unless its id is already selected. Returns whether it
    /// was added.
    pub fn add(&mut self, parcel: ParcelSummary) -> bool {
        if self.contains(&parcel.id) {
            return false;
        }
        self.items.push(parcel);
        self.revision += 1;
        true
    }

    /// Removes the parcel with `parcel_id`, keeping the order of the rest.
    pub fn remove(&mut self, parcel_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != parcel_id);
        let removed = self.items.len() != before;
        if removed {
            self.revision += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.revision += 1;
        }
    }

    pub fn contains(&self, parcel_id: &str) -> bool {
        self.items.iter().any(|item| item.id == parcel_id)
    }

    pub fn items(&self) -> &[ParcelSummary] {
        &self.items
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// One compose entry per selected parcel, in selection order.
    pub fn to_comps(&self) -> Vec<CmaComp> {
        self.items
            .iter()
            .map(|item| CmaComp::new(item.id.clone()))
            .collect()
    }
}
