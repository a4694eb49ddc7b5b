//! Feeder integration tests.
//!
//! Selection between built-in and custom decomposers, recursive resolution through
//! containers, limits and batch isolation.

use decanter::decomposers::register_default_decomposers;
use decanter::plugins::{DecomposeContext, Decomposer, DecomposerRegistry, Emit, Plugin};
use decanter::types::{Data, Record, RecordInfo, TextData};
use decanter::{DecanterConfig, DecanterError, Feeder, Result};
use std::sync::{Arc, RwLock};

mod helpers;

use helpers::{build_docx, build_pptx, build_tar};

/// Claims presentations with a configurable score and emits a fixed body.
struct FixedPresentation {
    name: &'static str,
    score: i32,
}

impl Plugin for FixedPresentation {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> String {
        "0.1.0".to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

impl Decomposer for FixedPresentation {
    fn target(&self, info: &RecordInfo) -> bool {
        info.extension() == Some("pptx")
    }

    fn target_score(&self, info: &RecordInfo) -> Option<i32> {
        self.target(info).then_some(self.score)
    }

    fn decompose(&self, data: Data<'_>, _ctx: &DecomposeContext<'_>, emit: &mut Emit<'_>) -> Result<()> {
        emit(Record::Text(TextData::new(self.name, data.info())))
    }
}

fn default_feeder(config: DecanterConfig) -> Feeder {
    Feeder::with_default_decomposers(config).expect("default decomposers should register")
}

fn feeder_with_extra(extra: FixedPresentation) -> Feeder {
    let config = DecanterConfig::default();
    let mut registry = DecomposerRegistry::new();
    register_default_decomposers(&mut registry, &config).unwrap();
    registry.register(extra.name, Arc::new(extra)).unwrap();
    Feeder::new(Arc::new(RwLock::new(registry)), config)
}

#[test]
fn test_lower_score_overrides_builtin() {
    let feeder = feeder_with_extra(FixedPresentation {
        name: "preferred",
        score: -10,
    });

    let pptx = build_pptx(&[(1, "A")]);
    let texts = feeder.extract(Data::from_bytes(pptx).with_path("deck.pptx")).unwrap();

    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].body(), "preferred");
}

#[test]
fn test_equal_score_keeps_earlier_registration() {
    let feeder = feeder_with_extra(FixedPresentation {
        name: "late",
        score: -1,
    });

    let pptx = build_pptx(&[(1, "A")]);
    let texts = feeder.extract(Data::from_bytes(pptx).with_path("deck.pptx")).unwrap();

    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].body(), "A");
}

#[test]
fn test_tar_with_presentation_resolves_to_text() {
    let pptx = build_pptx(&[(2, "B"), (1, "A")]);
    let tar = build_tar(&[("deck.pptx", pptx.as_slice())]);

    let mut records = Vec::new();
    default_feeder(DecanterConfig::default())
        .feed(Data::from_bytes(tar).with_path("bundle.tar"), |record| {
            let text = record.into_text().expect("only the presentation text reaches the caller");
            records.push(text);
            Ok(())
        })
        .unwrap();

    assert_eq!(records.len(), 1);
    let text = &records[0];
    assert_eq!(text.body(), "A\nB");
    assert_eq!(text.info().path(), Some("deck.txt"));
    assert_eq!(text.info().mime_type(), Some("text/plain"));

    let chain = text.source_chain();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].path(), Some("bundle.tar"));
    assert!(!chain[0].is_virtual());
    assert_eq!(chain[1].path(), Some("deck.pptx"));
    assert!(chain[1].is_virtual());
}

#[test]
fn test_nested_tars_resolve_depth_first() {
    let first = build_docx(&["first"], "One", "2020-01-01T00:00:00Z");
    let second = build_docx(&["second"], "Two", "2020-01-01T00:00:00Z");
    let third = build_docx(&["third"], "Three", "2020-01-01T00:00:00Z");
    let inner = build_tar(&[("b.docx", second.as_slice())]);
    let outer = build_tar(&[("a.docx", first.as_slice()), ("inner.tar", inner.as_slice()), ("c.docx", third.as_slice())]);

    let texts = default_feeder(DecanterConfig::default())
        .extract(Data::from_bytes(outer).with_path("outer.tar"))
        .unwrap();

    let bodies: Vec<&str> = texts.iter().map(TextData::body).collect();
    assert_eq!(bodies, vec!["first\n", "second\n", "third\n"]);
    assert_eq!(texts[1].source_chain().len(), 3);
}

#[test]
fn test_no_match_is_unsupported_format() {
    let mut calls = 0;
    let result = default_feeder(DecanterConfig::default()).feed(Data::from_bytes(Vec::new()), |_| {
        calls += 1;
        Ok(())
    });

    assert!(matches!(result, Err(DecanterError::UnsupportedFormat(_))));
    assert_eq!(calls, 0);
}

#[test]
fn test_mime_type_alone_selects_decomposer() {
    let tar = build_tar(&[("a.txt", b"A".as_slice())]);
    let mut paths = Vec::new();
    default_feeder(DecanterConfig::default())
        .feed(Data::from_bytes(tar).with_mime_type("application/x-tar"), |record| {
            paths.push(record.info().path().map(str::to_string));
            Ok(())
        })
        .unwrap();

    assert_eq!(paths, vec![Some("a.txt".to_string())]);
}

#[test]
fn test_depth_limit_trips_on_nested_containers() {
    let leaf = build_tar(&[("a.txt", b"A".as_slice())]);
    let middle = build_tar(&[("leaf.tar", leaf.as_slice())]);
    let top = build_tar(&[("middle.tar", middle.as_slice())]);

    let config = DecanterConfig {
        max_depth: 1,
        ..Default::default()
    };
    let result = default_feeder(config).extract(Data::from_bytes(top.clone()).with_path("top.tar"));
    assert!(matches!(result, Err(DecanterError::LimitExceeded(_))));

    let config = DecanterConfig {
        max_depth: 2,
        ..Default::default()
    };
    assert!(default_feeder(config).extract(Data::from_bytes(top).with_path("top.tar")).is_ok());
}

#[test]
fn test_byte_ceiling_trips_on_large_entry() {
    let pptx = build_pptx(&[(1, "A")]);
    let tar = build_tar(&[("deck.pptx", pptx.as_slice())]);

    let config = DecanterConfig {
        max_total_bytes: 16,
        ..Default::default()
    };
    let result = default_feeder(config).extract(Data::from_bytes(tar).with_path("bundle.tar"));
    assert!(matches!(result, Err(DecanterError::LimitExceeded(_))));
}

#[test]
fn test_extract_all_isolates_corrupt_input() {
    let good = build_pptx(&[(1, "A")]);
    let outcomes = default_feeder(DecanterConfig::default()).extract_all(vec![
        Data::from_bytes(good.clone()).with_path("good.pptx"),
        Data::from_bytes(b"definitely not a zip".to_vec()).with_path("bad.pptx"),
        Data::from_bytes(good).with_path("again.pptx"),
    ]);

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].result.as_ref().unwrap()[0].body(), "A");
    assert!(matches!(
        outcomes[1].result,
        Err(DecanterError::MalformedContainer { .. })
    ));
    assert_eq!(outcomes[1].source.path(), Some("bad.pptx"));
    assert_eq!(outcomes[2].result.as_ref().unwrap()[0].body(), "A");
}

#[test]
fn test_on_disk_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.docx");
    std::fs::write(&path, build_docx(&["Hello", "World"], "Report", "2020-01-01T00:00:00Z")).unwrap();

    let texts = default_feeder(DecanterConfig::default())
        .extract(Data::from_path(&path))
        .unwrap();

    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].body(), "Hello\nWorld\n");
    assert_eq!(texts[0].attribute("title").and_then(|v| v.as_text()), Some("Report"));
}
