//! Graph E2E tests against the real filesystem

use cooccur_graph::*;
use std::collections::BTreeSet;
use tempfile::tempdir;

fn topology(graph: &Graph) -> BTreeSet<(String, String)> {
    graph
        .entities()
        .flat_map(|e| {
            e.links()
                .keys()
                .map(move |t| (e.name().to_string(), t.clone()))
        })
        .collect()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_open_without_snapshot_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.txt");

    let mut graph = Graph::open(&path).unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.source_path(), path.as_path());

    let err = graph.load(&path).unwrap_err();
    assert!(err.is_missing_snapshot());
    assert!(graph.is_empty());
}

#[test]
fn test_open_loads_existing_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.txt");
    std::fs::write(&path, "apple|pie|tree\npie|apple\ntree\n").unwrap();

    let graph = Graph::open(&path).unwrap();
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.get("apple").unwrap().link("pie").unwrap().weight(), 1);
    assert!(graph.get("tree").unwrap().links().is_empty());
}

#[test]
fn test_open_propagates_unreadable_snapshot() {
    let dir = tempdir().unwrap();
    // A directory exists but cannot be read as a file.
    let err = Graph::open(dir.path()).unwrap_err();
    assert!(matches!(err, GraphError::Io { .. }));
}

// ============================================================================
// Ingestion from files
// ============================================================================

#[test]
fn test_read_text_file() {
    let dir = tempdir().unwrap();
    let text = dir.path().join("story.txt");
    std::fs::write(
        &text,
        "The cat sat on the mat.\nThe dog sat (on the log)! Did the cat see?",
    )
    .unwrap();

    let mut graph = Graph::open(dir.path().join("graph.txt")).unwrap();
    let report = graph.read(&text).unwrap();

    assert_eq!(report.words, 16);
    assert_eq!(report.sentences, 4);
    assert_eq!(report.new_entities, graph.len());

    // "the" occurs twice in the first sentence: two passes against "cat".
    let the = graph.get("the").unwrap();
    assert_eq!(the.link("cat").unwrap().weight(), 3);
    assert_eq!(the.link("mat").unwrap().weight(), 2);
    assert!(the.link("the").is_none());

    let top = graph.top_relations("the", 2).unwrap();
    assert_eq!(top.len(), 2);
    assert!(top[0].weight() >= top[1].weight());
}

#[test]
fn test_read_missing_file_leaves_graph_unchanged() {
    let dir = tempdir().unwrap();
    let mut graph = Graph::open(dir.path().join("graph.txt")).unwrap();
    graph.ingest_text("one two");

    let err = graph.read(dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, GraphError::Io { .. }));
    assert!(err.to_string().contains("nope.txt"));
    assert_eq!(graph.len(), 2);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_save_and_reopen_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.txt");

    let mut graph = Graph::open(&path).unwrap();
    graph.ingest_text("cat dog cat. Dog bird; fish");
    let before = topology(&graph);
    assert_eq!(graph.get("cat").unwrap().link("dog").unwrap().weight(), 2);

    let report = graph.save().unwrap();
    assert_eq!(report.entities, 4);
    assert_eq!(report.format, SnapshotFormat::TopologyV1);

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, "bird|dog\ncat|dog\ndog|bird|cat\nfish\n");

    let restored = Graph::open(&path).unwrap();
    assert_eq!(topology(&restored), before);
    assert_eq!(restored.len(), graph.len());
    for entity in restored.entities() {
        for link in entity.links().values() {
            assert_eq!(link.weight(), 1, "{} -> {}", entity.name(), link.target());
        }
    }
}

#[test]
fn test_save_overwrites_previous_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.txt");
    std::fs::write(&path, "old|stale\n").unwrap();

    let mut graph = Graph::open(&path).unwrap();
    graph.ingest_text("new words");
    graph.save().unwrap();

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, "new|words\nold|stale\nstale\nwords|new\n");
}

#[test]
fn test_save_to_unwritable_path_fails() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    // The parent of the snapshot is a regular file.
    let mut graph = Graph::open(blocker.join("graph.txt")).unwrap();
    graph.ingest_text("a b");
    let err = graph.save().unwrap_err();
    assert!(matches!(err, GraphError::Io { .. }));
}

#[test]
fn test_config_file_drives_tokenization() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        r#"{ "sentence_delimiters": "\n", "word_trim": "" }"#,
    )
    .unwrap();

    let config = GraphConfig::from_json_file(&config_path).unwrap();
    let mut graph = Graph::open_with_config(dir.path().join("graph.txt"), config).unwrap();
    graph.ingest_text("Hello, world. Same sentence\nnext");

    assert!(graph.get("hello,").is_some());
    assert!(graph.get("hello").is_none());
    assert_eq!(
        graph
            .get("same")
            .and_then(|e| e.link("world."))
            .map(Link::weight),
        Some(1)
    );
    assert!(graph.get("next").unwrap().links().is_empty());
}

#[test]
fn test_custom_word_delimiters_survive_save_and_reopen() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, r#"{ "word_delimiters": "," }"#).unwrap();
    let path = dir.path().join("graph.txt");

    let config = GraphConfig::from_json_file(&config_path).unwrap();
    let mut graph = Graph::open_with_config(&path, config.clone()).unwrap();
    graph.ingest_text("alpha\nbeta,gamma");
    assert_eq!(graph.len(), 3);
    let before = topology(&graph);
    graph.save().unwrap();

    assert!(std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .all(|line| !line.is_empty()));

    let restored = Graph::open_with_config(&path, config).unwrap();
    assert_eq!(restored.len(), graph.len());
    assert_eq!(topology(&restored), before);
}

#[test]
fn test_hand_edited_snapshot_is_queryable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.txt");
    std::fs::write(&path, "Cat|Dog\n").unwrap();

    let graph = Graph::open(&path).unwrap();
    let names: Vec<&str> = graph.entities().map(Entity::name).collect();
    assert_eq!(names, vec!["cat", "dog"]);
    assert!(graph.get("Cat").is_some());
    assert_eq!(graph.describe_entity("Cat"), "cat: \ndog (1)");
}
