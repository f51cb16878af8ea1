//! Tests for reading and rendering legacy component blocks

use schparts::{load_schematic, FieldKind, SchPartsError, FIELD_NAMES};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_parse_fixture_components() {
    let schematic = load_schematic(&fixture_path("board.sch")).expect("Should parse");

    assert_eq!(schematic.version.as_deref(), Some("KiCad 4"));
    let refs: Vec<&str> = schematic.components.iter().map(|c| c.reference()).collect();
    assert_eq!(refs, vec!["C1", "R1", "C2", "#PWR01"]);

    let r1 = &schematic.components[1];
    assert_eq!(r1.value(), "10k");
    assert_eq!(
        r1.field(FieldKind::Footprint).map(|f| f.text()),
        Some("Resistor_SMD:R_0402_1005Metric")
    );
    assert!(!r1.is_normalized());

    let c2 = &schematic.components[2];
    assert!(c2.is_normalized());
    assert_eq!(c2.alt_references.len(), 1);
    for (field, name) in c2.fields.iter().zip(FIELD_NAMES) {
        assert_eq!(field.display_name(), name);
    }
}

#[test]
fn test_render_reproduces_every_block() {
    let path = fixture_path("board.sch");
    let content = std::fs::read_to_string(&path).unwrap();
    let schematic = load_schematic(&path).unwrap();

    let blocks: Vec<String> = content
        .split_inclusive('\n')
        .fold((Vec::new(), None::<String>), |(mut blocks, current), line| {
            match current {
                Some(mut block) => {
                    block.push_str(line);
                    if line == "$EndComp\n" {
                        blocks.push(block);
                        (blocks, None)
                    } else {
                        (blocks, Some(block))
                    }
                }
                None if line == "$Comp\n" => (blocks, Some(line.to_string())),
                None => (blocks, None),
            }
        })
        .0;

    assert_eq!(blocks.len(), schematic.components.len());
    for (block, component) in blocks.iter().zip(&schematic.components) {
        assert_eq!(&component.to_text(), block);
    }
}

#[test]
fn test_parse_missing_file() {
    let result = load_schematic(&PathBuf::from("not_a_real_file.sch"));
    match result {
        Err(SchPartsError::Io { path, .. }) => assert_eq!(path, PathBuf::from("not_a_real_file.sch")),
        other => panic!("expected IO error, got {:?}", other.map(|s| s.components.len())),
    }
}

#[test]
fn test_parse_modern_schematic_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.kicad_sch");
    std::fs::write(&path, "(kicad_sch (version 20230121) (generator eeschema))\n").unwrap();

    let result = load_schematic(&path);
    assert!(matches!(result, Err(SchPartsError::UnsupportedFormat(_))));
}

#[test]
fn test_parse_garbage_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sch");
    std::fs::write(&path, "just some notes\n$Comp\n").unwrap();

    let result = load_schematic(&path);
    assert!(matches!(result, Err(SchPartsError::Parse(_))));
}
