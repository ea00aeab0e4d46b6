use std::collections::HashMap;

use serde::Serialize;
use super::scan_result::Vulnerability;

/// Cross-image view of one vulnerability ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub id: String,
    /// Package ecosystem of the group that last reported this ID.
    pub kind: String,
    pub pkg_name: String,
    pub primary_url: String,
    /// Affected images, first-seen order, no duplicates.
    pub artifacts: Vec<String>,
}

impl SummaryEntry {
    pub fn markdown_link(&self) -> String {
        format!("[{}]({})", self.id, self.primary_url)
    }
}

/// Accumulator merging vulnerability records across scans, keyed by
/// vulnerability ID and iterated in first-seen order.
///
/// Metadata is last-write-wins; the artifact list only grows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VulnerabilitySummary {
    entries: Vec<SummaryEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl VulnerabilitySummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, record: &Vulnerability, kind: &str, artifact: &str) {
        let idx = match self.index.get(&record.vulnerability_id) {
            Some(&idx) => idx,
            None => {
                self.entries.push(SummaryEntry {
                    id: record.vulnerability_id.clone(),
                    kind: String::new(),
                    pkg_name: String::new(),
                    primary_url: String::new(),
                    artifacts: Vec::new(),
                });
                let idx = self.entries.len() - 1;
                self.index.insert(record.vulnerability_id.clone(), idx);
                idx
            }
        };

        let entry = &mut self.entries[idx];
        entry.kind = kind.to_string();
        entry.pkg_name = record.pkg_name.clone();
        entry.primary_url = record.primary_url.clone();
        if !entry.artifacts.iter().any(|a| a == artifact) {
            entry.artifacts.push(artifact.to_string());
        }
    }

    pub fn get(&self, id: &str) -> Option<&SummaryEntry> {
        self.index.get(id).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
