//! The co-occurrence graph: ingestion, queries and snapshot persistence.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::config::GraphConfig;
use crate::entity::{Entity, Link};
use crate::error::{GraphError, Result};
use crate::format::SnapshotFormat;
use crate::store::{FsStore, TextStore};
use crate::tokenize::{normalize_word, CharSetTokenizer, Tokenizer, LINE_BREAKS};

/// Outcome of ingesting one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadReport {
    /// Non-empty words processed
    pub words: usize,
    /// Sentences that contained at least one word
    pub sentences: usize,
    /// Entities that did not exist before this read
    pub new_entities: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub format: SnapshotFormat,
    pub entities: usize,
    pub links: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub path: PathBuf,
    /// Entity count after the load
    pub entities: usize,
    pub new_entities: usize,
    pub links: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub entities: usize,
    pub links: usize,
    pub total_weight: u64,
}

/// Owns every entity, keyed and ordered by name.
pub struct Graph {
    entities: BTreeMap<String, Entity>,
    source_path: PathBuf,
    config: GraphConfig,
    store: Box<dyn TextStore>,
    tokenizer: Box<dyn Tokenizer>,
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("source_path", &self.source_path)
            .field("entities", &self.entities.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Graph {
    /// Open a graph bound to `path` on the local filesystem.
    ///
    /// An existing snapshot is loaded; a missing one leaves the graph empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_config(path, GraphConfig::default())
    }

    pub fn open_with_config(path: impl Into<PathBuf>, config: GraphConfig) -> Result<Self> {
        Self::open_with(path, config, FsStore, CharSetTokenizer)
    }

    pub fn open_with(
        path: impl Into<PathBuf>,
        config: GraphConfig,
        store: impl TextStore + 'static,
        tokenizer: impl Tokenizer + 'static,
    ) -> Result<Self> {
        let source_path = path.into();
        let mut graph = Self {
            entities: BTreeMap::new(),
            source_path: source_path.clone(),
            config,
            store: Box::new(store),
            tokenizer: Box::new(tokenizer),
        };

        match graph.load(&source_path) {
            Ok(_) => {}
            Err(err) if err.is_missing_snapshot() => {
                debug!(path = %source_path.display(), "no snapshot yet, starting empty");
            }
            Err(err) => return Err(err),
        }

        Ok(graph)
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in name order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            entities: self.entities.len(),
            ..GraphStats::default()
        };
        for entity in self.entities.values() {
            stats.links += entity.links().len();
            stats.total_weight += entity
                .links()
                .values()
                .map(|l| u64::from(l.weight()))
                .sum::<u64>();
        }
        stats
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Read a text file through the store and ingest it.
    ///
    /// Fails only when the file cannot be read; the graph is untouched then.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<ReadReport> {
        let path = path.as_ref();
        let text = self.store.read(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "file can't be read");
            GraphError::io(path, e)
        })?;

        info!(path = %path.display(), "reading text");
        let report = self.ingest_text(&text);
        info!(
            path = %path.display(),
            words = report.words,
            new_entities = report.new_entities,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "text ingested"
        );
        Ok(report)
    }

    /// Ingest text already in memory.
    ///
    /// Every word occurrence of a sentence is linked to every other
    /// occurrence of that sentence, so a word repeated `k` times contributes
    /// `k` linking passes.
    pub fn ingest_text(&mut self, text: &str) -> ReadReport {
        let started = Instant::now();
        let before = self.entities.len();
        let mut words = 0usize;
        let mut sentences = 0usize;

        let raw_sentences = self
            .tokenizer
            .split(text, &self.config.sentence_delimiters);

        for sentence in raw_sentences {
            // Line breaks separate words even when the configured delimiters
            // leave them out.
            let raw_words: Vec<&str> = self
                .tokenizer
                .split(sentence, &self.config.word_delimiters)
                .into_iter()
                .flat_map(|piece| self.tokenizer.split(piece, LINE_BREAKS))
                .collect();

            let mut names: Vec<String> = Vec::with_capacity(raw_words.len());
            for raw in raw_words {
                let Some(word) = normalize_word(raw, &self.config.word_trim) else {
                    continue;
                };
                words += 1;
                self.find_or_create(&word);
                names.push(word);
            }

            if names.is_empty() {
                continue;
            }
            sentences += 1;

            for name in &names {
                if let Some(entity) = self.entities.get_mut(name) {
                    entity.link_to_all(names.iter().map(String::as_str));
                }
            }
        }

        ReadReport {
            words,
            sentences,
            new_entities: self.entities.len() - before,
            elapsed: started.elapsed(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Look up an entity. Never creates one.
    ///
    /// The name goes through the same normalization as ingested words.
    pub fn get(&self, name: &str) -> Option<&Entity> {
        let key = normalize_word(name, &self.config.word_trim)?;
        self.entities.get(&key)
    }

    /// Every entity description, each followed by a newline.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for entity in self.entities.values() {
            out.push_str(&entity.describe());
            out.push('\n');
        }
        out
    }

    pub fn describe_entity(&self, name: &str) -> String {
        match self.get(name) {
            Some(entity) => entity.describe(),
            None => format!("Entity '{name}' not found"),
        }
    }

    /// Strongest `n` relations of `name`, or `None` if the entity is absent.
    pub fn top_relations(&self, name: &str, n: usize) -> Option<Vec<&Link>> {
        self.get(name).map(|entity| entity.top_relations(n))
    }

    pub(crate) fn find_or_create(&mut self, name: &str) -> &mut Entity {
        self.entities
            .entry(name.to_string())
            .or_insert_with(|| Entity::new(name))
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write the topology to the bound path, replacing its content.
    pub fn save(&self) -> Result<SaveReport> {
        let format = self.config.format;
        info!(
            path = %self.source_path.display(),
            entities = self.entities.len(),
            format = format.as_str(),
            "saving graph"
        );

        let contents = format.encode(self.entities.values());
        self.store
            .write(&self.source_path, &contents)
            .map_err(|e| {
                error!(path = %self.source_path.display(), error = %e, "can't save graph");
                GraphError::io(&self.source_path, e)
            })?;

        let stats = self.stats();
        Ok(SaveReport {
            path: self.source_path.clone(),
            format,
            entities: stats.entities,
            links: stats.links,
        })
    }

    /// Merge the snapshot at `path` into this graph.
    ///
    /// Each listed link is applied once, so restored links weigh 1 on top of
    /// whatever the graph already held. Names are normalized like ingested
    /// words; fields that normalize to nothing are skipped. A missing file is
    /// reported as [`GraphError::SnapshotMissing`].
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        if !self.store.exists(path) {
            return Err(GraphError::SnapshotMissing(path.to_path_buf()));
        }

        info!(path = %path.display(), "loading snapshot");
        let text = self.store.read(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "can't read snapshot");
            GraphError::io(path, e)
        })?;

        let before = self.entities.len();
        let mut links = 0usize;
        for record in self.config.format.decode(&text) {
            let Some(name) = normalize_word(&record.name, &self.config.word_trim) else {
                continue;
            };
            let targets: Vec<String> = record
                .links
                .iter()
                .filter_map(|t| normalize_word(t, &self.config.word_trim))
                .collect();
            for target in &targets {
                self.find_or_create(target);
            }
            self.find_or_create(&name)
                .link_to_all(targets.iter().map(String::as_str));
            links += targets.len();
        }

        info!(entities = self.entities.len(), "snapshot loaded");
        Ok(LoadReport {
            path: path.to_path_buf(),
            entities: self.entities.len(),
            new_entities: self.entities.len() - before,
            links,
        })
    }
}
