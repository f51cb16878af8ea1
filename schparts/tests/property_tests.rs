//! Property tests for value sanitizing and field normalization

use proptest::prelude::*;
use schparts::{sanitize_value, FieldUpdate, LegacyParser, FIELD_NAMES};

/// A component block with `count` fields (1..=9) whose values come from `values`.
fn block(values: &[String]) -> Vec<String> {
    let mut lines = vec![
        "L Device:R R1".to_string(),
        "U 1 1 5C000001".to_string(),
        "P 1000 1000".to_string(),
    ];
    for (i, value) in values.iter().enumerate() {
        let name = if i >= 4 {
            format!(" \"{}\"", FIELD_NAMES[i])
        } else {
            String::new()
        };
        lines.push(format!(
            "F {} \"{}\" H 1000 {} 50  0001 C CNN{}",
            i,
            value,
            1000 + 100 * i,
            name
        ));
    }
    lines.push("\t1    1000 1000".to_string());
    lines
}

fn field_values() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z0-9_:.~ -]{0,12}", 1..=9)
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(s in ".*") {
        let once = sanitize_value(&s);
        prop_assert_eq!(sanitize_value(&once), once);
    }

    #[test]
    fn sanitize_quotes_unquoted_input(s in "[^\"].*") {
        let quoted = sanitize_value(&s);
        prop_assert!(quoted.starts_with('"'));
        prop_assert!(quoted.ends_with('"'));
        prop_assert_eq!(&quoted[1..quoted.len() - 1], s.as_str());
    }

    #[test]
    fn normalize_is_complete_and_idempotent(values in field_values()) {
        let lines = block(&values);
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut comp = LegacyParser::parse_component_block(&lines, 1).unwrap();

        comp.normalize_fields().unwrap();
        prop_assert_eq!(comp.fields.len(), FIELD_NAMES.len());
        for (field, name) in comp.fields.iter().zip(FIELD_NAMES) {
            prop_assert_eq!(field.display_name(), name);
        }

        let once = comp.clone();
        prop_assert_eq!(comp.normalize_fields().unwrap(), 0);
        prop_assert_eq!(comp, once);
    }

    #[test]
    fn render_round_trips(values in field_values()) {
        let lines = block(&values);
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let comp = LegacyParser::parse_component_block(&refs, 1).unwrap();

        let rendered = comp.to_lines();
        prop_assert_eq!(&rendered[1..rendered.len() - 1], &lines[..]);
    }

    #[test]
    fn setter_touches_only_footprint(values in field_values(), footprint in "[A-Za-z0-9_:]{1,20}") {
        let lines = block(&values);
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut comp = LegacyParser::parse_component_block(&lines, 1).unwrap();
        comp.normalize_fields().unwrap();
        let before = comp.clone();

        comp.set_fields(&FieldUpdate::new().footprint(footprint.clone())).unwrap();

        for (i, (after, before)) in comp.fields.iter().zip(&before.fields).enumerate() {
            if i == 2 {
                prop_assert_eq!(&after.value, &format!("\"{}\"", footprint));
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }
}
