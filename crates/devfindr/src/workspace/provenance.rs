use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use super::fetch::FetchScope;
use crate::client::PlatformApi;
use crate::contracts::ProvenanceEntry;

pub const LOADING_HINT: &str = "Loading provenance...";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvenanceLine {
    pub source_name: String,
    pub source_url: String,
    pub licence: String,
    pub last_fetched: String,
    pub refresh_cadence: String,
}

impl From<&ProvenanceEntry> for ProvenanceLine {
    fn from(entry: &ProvenanceEntry) -> Self {
        Self {
            source_name: entry.source_name.clone(),
            source_url: entry.source_url.clone(),
            licence: entry.license.clone(),
            last_fetched: entry.fetched_at_display(),
            refresh_cadence: entry.refresh_cadence.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvenanceView {
    pub open: bool,
    pub entries: Vec<ProvenanceLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_hint: Option<&'static str>,
}

/// Source and licence disclosure for one entity.
pub struct ProvenancePanel<A> {
    api: Arc<A>,
    entity_type: String,
    entity_id: String,
    open: bool,
    entries: Vec<ProvenanceEntry>,
    fetch: FetchScope<Vec<ProvenanceEntry>>,
}

impl<A: PlatformApi + 'static> ProvenancePanel<A> {
    pub fn new(api: Arc<A>, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            api,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            open: false,
            entries: Vec::new(),
            fetch: FetchScope::new("provenance"),
        }
    }

    pub fn mount(&mut self) {
        let api = Arc::clone(&self.api);
        let entity_type = self.entity_type.clone();
        let entity_id = self.entity_id.clone();
        self.fetch
            .start(async move { api.provenance(&entity_type, &entity_id).await });
    }

    /// Points the panel at another entity and refetches. Entries from the
    /// previous entity are cleared immediately.
    pub fn rekey(&mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        if entity_type == self.entity_type && entity_id == self.entity_id {
            return;
        }
        self.entity_type = entity_type;
        self.entity_id = entity_id;
        self.entries.clear();
        self.mount();
    }

    /// Applies the outstanding fetch, if any. Failures are logged and leave the
    /// current entries in place.
    pub async fn settle(&mut self) {
        if let Some(outcome) = self.fetch.settle().await {
            match outcome {
                Ok(entries) => self.entries = entries,
                Err(err) => error!(
                    entity_type = %self.entity_type,
                    entity_id = %self.entity_id,
                    error = %err,
                    "provenance fetch failed"
                ),
            }
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn entity(&self) -> (&str, &str) {
        (&self.entity_type, &self.entity_id)
    }

    pub fn entries(&self) -> &[ProvenanceEntry] {
        &self.entries
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.open {
            "Hide provenance"
        } else {
            "Show provenance"
        }
    }

    pub fn view(&self) -> ProvenanceView {
        ProvenanceView {
            open: self.open,
            entries: self.entries.iter().map(ProvenanceLine::from).collect(),
            empty_hint: self.entries.is_empty().then_some(LOADING_HINT),
        }
    }
}
