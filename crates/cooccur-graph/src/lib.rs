//! Weighted word co-occurrence graph
//!
//! Text is split into sentences and words; every word becomes an [`Entity`]
//! and every pair of word occurrences sharing a sentence strengthens a
//! directed [`Link`]. The graph answers "what does this word appear with
//! most?" and saves its topology to a flat text snapshot.
//!
//! ```text
//!   text ──► Tokenizer ──► sentences ──► words ──► Graph.entities
//!                                                    │
//!                          snapshot file ◄── SnapshotFormat (topology_v1)
//! ```
//!
//! File access and splitting are capabilities ([`TextStore`], [`Tokenizer`])
//! handed to the graph when it is opened.

pub mod config;
pub mod entity;
pub mod error;
pub mod format;
pub mod graph;
pub mod store;
pub mod tokenize;

pub use config::GraphConfig;
pub use entity::{Entity, Link};
pub use error::{GraphError, Result};
pub use format::{SnapshotFormat, SnapshotRecord, FIELD_DELIMITER};
pub use graph::{Graph, GraphStats, LoadReport, ReadReport, SaveReport};
pub use store::{FsStore, MemoryStore, TextStore};
pub use tokenize::{normalize_word, CharSetTokenizer, Tokenizer, LINE_BREAKS};
