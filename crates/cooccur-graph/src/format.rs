//! Snapshot formats (versioned).
//!
//! Only one format exists today:
//!
//! - **`topology_v1`**: flat text, one entity per line,
//!   `<name>|<linked_1>|<linked_2>...\n`, entities and links in name order.
//!   No header, no weights, no escaping: names never contain `|` because
//!   ingestion strips it.
//!
//! `topology_v1` records which links exist, not how strong they are. Loading
//! it links each pair exactly once, so every restored weight is 1. A lossless
//! format belongs in a new variant, leaving `topology_v1` files readable.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Separates the entity name from its linked names on a snapshot line.
pub const FIELD_DELIMITER: char = '|';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotFormat {
    #[default]
    TopologyV1,
}

/// One decoded snapshot line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub name: String,
    pub links: Vec<String>,
}

impl SnapshotFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotFormat::TopologyV1 => "topology_v1",
        }
    }

    pub fn encode<'a, I>(self, entities: I) -> String
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        match self {
            SnapshotFormat::TopologyV1 => encode_topology_v1(entities),
        }
    }

    /// Decode snapshot text.
    ///
    /// Lines with an empty name and empty link fields are skipped rather
    /// than rejected.
    pub fn decode(self, text: &str) -> Vec<SnapshotRecord> {
        match self {
            SnapshotFormat::TopologyV1 => decode_topology_v1(text),
        }
    }
}

fn encode_topology_v1<'a, I>(entities: I) -> String
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut out = String::new();
    for entity in entities {
        out.push_str(entity.name());
        for target in entity.links().keys() {
            out.push(FIELD_DELIMITER);
            out.push_str(target);
        }
        out.push('\n');
    }
    out
}

fn decode_topology_v1(text: &str) -> Vec<SnapshotRecord> {
    let mut records = Vec::new();
    for line in text.lines() {
        let mut fields = line.split(FIELD_DELIMITER).map(str::trim);
        let name = match fields.next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let links = fields
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        records.push(SnapshotRecord { name, links });
    }
    records
}
