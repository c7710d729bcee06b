//! Reconciles parsed stream entries into channel records
//!
//! Without a reference table every entry becomes a channel as-is. With one,
//! entries are joined against the table on their raw identifier and only
//! matched, first-seen identifiers survive.

use std::collections::HashSet;

use crate::models::{Channel, ReferenceEntry, StreamEntry};

/// Counters describing what the merge kept and dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub merged: usize,
    /// Entries skipped because their raw id was already emitted
    pub duplicates: usize,
    /// Entries with no reference row
    pub unmatched: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub channels: Vec<Channel>,
    pub report: MergeReport,
}

#[derive(Debug, Clone)]
pub struct CatalogMerger {
    country: String,
}

impl CatalogMerger {
    /// `country` is stamped on every channel built without a reference table
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
        }
    }

    /// Merge in single-source mode, or two-source mode when `reference` is given
    pub fn merge(&self, streams: Vec<StreamEntry>, reference: Option<&[ReferenceEntry]>) -> MergeOutcome {
        match reference {
            Some(rows) => Self::join_reference(streams, rows),
            None => self.from_streams(streams),
        }
    }

    /// One channel per entry, in parse order, keyed by the normalized id
    pub fn from_streams(&self, streams: Vec<StreamEntry>) -> MergeOutcome {
        let channels: Vec<Channel> = streams
            .into_iter()
            .map(|stream| Channel {
                id: stream.id,
                name: stream.name,
                country: self.country.clone(),
                logo: stream.logo,
                stream_url: stream.stream_url,
                headers: Some(stream.headers),
            })
            .collect();

        MergeOutcome {
            report: MergeReport {
                merged: channels.len(),
                ..MergeReport::default()
            },
            channels,
        }
    }

    /// Join entries against reference rows on the exact raw identifier
    ///
    /// The first entry for a raw id wins and the first matching row supplies
    /// the metadata; the entry only contributes its stream URL.
    pub fn join_reference(streams: Vec<StreamEntry>, reference: &[ReferenceEntry]) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        let mut emitted: HashSet<String> = HashSet::new();

        for stream in streams {
            if emitted.contains(&stream.raw_id) {
                outcome.report.duplicates += 1;
                continue;
            }

            let Some(row) = reference.iter().find(|row| row.id == stream.raw_id) else {
                outcome.report.unmatched += 1;
                continue;
            };

            outcome.channels.push(Channel {
                id: row.id.clone(),
                name: row.name.clone(),
                country: row.country.clone(),
                logo: row.logo.clone(),
                stream_url: stream.stream_url,
                headers: None,
            });
            emitted.insert(stream.raw_id);
        }

        outcome.report.merged = outcome.channels.len();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::USER_AGENT_HEADER;
    use std::collections::BTreeMap;

    fn stream(raw_id: &str, url: &str) -> StreamEntry {
        StreamEntry {
            id: crate::utils::normalize_id(raw_id),
            raw_id: raw_id.to_string(),
            name: format!("{raw_id} name"),
            stream_url: url.to_string(),
            logo: None,
            headers: BTreeMap::from([(USER_AGENT_HEADER.to_string(), "UA".to_string())]),
        }
    }

    fn row(id: &str, name: &str, country: &str) -> ReferenceEntry {
        ReferenceEntry {
            id: id.to_string(),
            name: name.to_string(),
            country: country.to_string(),
            closed: false,
            logo: Some(format!("http://logos/{id}.png")),
        }
    }

    #[test]
    fn single_source_keeps_every_entry() {
        let merger = CatalogMerger::new("PT");
        let outcome = merger.merge(vec![stream("A", "http://a"), stream("A", "http://a2")], None);

        assert_eq!(outcome.channels.len(), 2);
        assert_eq!(outcome.report.merged, 2);
        assert!(outcome.channels.iter().all(|c| c.country == "PT" && c.id == "A"));
        assert_eq!(outcome.channels[1].stream_url, "http://a2");
        assert_eq!(
            outcome.channels[0].headers.as_ref().unwrap()[USER_AGENT_HEADER],
            "UA"
        );
    }

    #[test]
    fn single_source_uses_normalized_id() {
        let merger = CatalogMerger::new("PT");
        let outcome = merger.from_streams(vec![stream("Canal É", "http://c")]);
        assert_eq!(outcome.channels[0].id, "CanalE");
    }

    #[test]
    fn two_source_first_occurrence_wins() {
        let reference = vec![row("SIC", "SIC", "PT")];
        let outcome = CatalogMerger::new("PT").merge(
            vec![stream("SIC", "http://first"), stream("SIC", "http://second")],
            Some(reference.as_slice()),
        );

        assert_eq!(outcome.channels.len(), 1);
        assert_eq!(outcome.channels[0].stream_url, "http://first");
        assert_eq!(outcome.report.duplicates, 1);
    }

    #[test]
    fn two_source_copies_reference_metadata() {
        let reference = vec![row("RTP1.pt", "RTP 1", "PT"), row("BBC1.uk", "BBC One", "UK")];
        let outcome = CatalogMerger::new("XX").merge(vec![stream("BBC1.uk", "http://bbc")], Some(reference.as_slice()));

        let channel = &outcome.channels[0];
        assert_eq!(channel.id, "BBC1.uk");
        assert_eq!(channel.name, "BBC One");
        assert_eq!(channel.country, "UK");
        assert_eq!(channel.logo.as_deref(), Some("http://logos/BBC1.uk.png"));
        assert_eq!(channel.headers, None);
    }

    #[test]
    fn two_source_matches_raw_id_exactly() {
        let reference = vec![row("Canal É", "Canal", "PT")];
        let outcome = CatalogMerger::new("PT").merge(
            vec![stream("CanalE", "http://n"), stream("canal é", "http://l"), stream("Canal É", "http://r")],
            Some(reference.as_slice()),
        );

        assert_eq!(outcome.channels.len(), 1);
        assert_eq!(outcome.channels[0].stream_url, "http://r");
        assert_eq!(outcome.report.unmatched, 2);
    }

    #[test]
    fn two_source_takes_first_matching_row() {
        let reference = vec![row("A", "First", "PT"), row("A", "Second", "ES")];
        let outcome = CatalogMerger::join_reference(vec![stream("A", "http://a")], &reference);
        assert_eq!(outcome.channels[0].name, "First");
        assert_eq!(outcome.channels[0].country, "PT");
    }

    #[test]
    fn unmatched_entry_is_counted() {
        let outcome = CatalogMerger::join_reference(vec![stream("X", "http://x")], &[]);
        assert!(outcome.channels.is_empty());
        assert_eq!(outcome.report, MergeReport { merged: 0, duplicates: 0, unmatched: 1 });
    }
}
