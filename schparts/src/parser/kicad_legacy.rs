//! KiCad Legacy Schematic Blocks (Versions 4-5)
//!
//! Reads and writes the `$Comp` / `$EndComp` blocks of the legacy EESchema text
//! format. Everything outside those blocks is left to the caller as opaque text.
//!
//! Block layout:
//! - `L <lib name> <reference>`
//! - `U <unit> <convert> <timestamp>`
//! - `P <x> <y>`
//! - zero or more `AR Path=... Ref=... Part=...`
//! - one `F` line per field
//! - tab-indented legacy lines (unit position and orientation matrix)

use crate::parser::format_detector::detect_format;
use crate::parser::schema::*;

/// Marker line opening a component block.
pub const COMP_START: &str = "$Comp";
/// Marker line closing a component block.
pub const COMP_END: &str = "$EndComp";

/// Error type for legacy format parsing
#[derive(Debug, thiserror::Error)]
pub enum LegacyParseError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Parser for the component blocks of KiCad 4-5 schematics
pub struct LegacyParser;

impl LegacyParser {
    /// Parse the components of a legacy schematic file (KiCad 4-5)
    pub fn parse_legacy_schematic(content: &str, filename: &str) -> Result<Schematic, LegacyParseError> {
        let version = match detect_format(content) {
            Some(format) if format.is_legacy() => format.as_str().to_string(),
            Some(format) => {
                return Err(LegacyParseError::InvalidFormat(format!(
                    "{} schematics are not legacy EESchema files",
                    format.as_str()
                )))
            }
            None => {
                return Err(LegacyParseError::InvalidFormat(
                    "Expected EESchema header".to_string(),
                ))
            }
        };

        let lines: Vec<&str> = content.lines().collect();
        let mut components = Vec::new();
        let mut line_idx = 0;

        while line_idx < lines.len() {
            if lines[line_idx] != COMP_START {
                line_idx += 1;
                continue;
            }

            let start = line_idx;
            let body_start = line_idx + 1;
            let mut end = None;
            for (i, line) in lines.iter().enumerate().skip(body_start) {
                if *line == COMP_END {
                    end = Some(i);
                    break;
                }
                if *line == COMP_START {
                    return Err(LegacyParseError::Parse {
                        line: i + 1,
                        message: format!("{} inside the block opened on line {}", COMP_START, start + 1),
                    });
                }
            }
            let end = end.ok_or_else(|| LegacyParseError::Parse {
                line: start + 1,
                message: format!("{} without matching {}", COMP_START, COMP_END),
            })?;

            components.push(Self::parse_component_block(&lines[body_start..end], body_start + 1)?);
            line_idx = end + 1;
        }

        tracing::debug!("Parsed {} component(s) from {}", components.len(), filename);

        Ok(Schematic {
            filename: filename.into(),
            version: Some(version),
            components,
        })
    }

    /// Parse the lines between `$Comp` and `$EndComp`.
    ///
    /// `first_line` is the 1-based file line of `lines[0]`, used in errors.
    pub fn parse_component_block(lines: &[&str], first_line: usize) -> Result<Component, LegacyParseError> {
        let mut component = Component {
            label: LabelLine::default(),
            unit: UnitLine::default(),
            position: PositionLine::default(),
            alt_references: Vec::new(),
            fields: Vec::new(),
            trailing: Vec::new(),
        };

        for (offset, line) in lines.iter().enumerate() {
            if line.starts_with('\t') {
                component.trailing.push(line.to_string());
                continue;
            }

            let tokens = tokenize(line, first_line + offset)?;
            let Some((key, values)) = tokens.split_first() else {
                component.trailing.push(line.to_string());
                continue;
            };

            match key.as_str() {
                "L" => {
                    let ([name, reference], extra) = take_tokens::<2>(values);
                    component.label = LabelLine { name, reference, extra };
                }
                "U" => {
                    let ([unit, convert, timestamp], extra) = take_tokens::<3>(values);
                    component.unit = UnitLine { unit, convert, timestamp, extra };
                }
                "P" => {
                    let ([x, y], extra) = take_tokens::<2>(values);
                    component.position = PositionLine { x, y, extra };
                }
                "AR" => component.alt_references.push(line.to_string()),
                "F" => component.fields.push(Field::from_tokens(values)),
                _ => component.trailing.push(line.to_string()),
            }
        }

        Ok(component)
    }
}

/// Split a block line into tokens. A token opening with `"` runs to the next
/// unescaped `"` and keeps both quotes; anything else runs to the next whitespace.
fn tokenize(line: &str, line_no: usize) -> Result<Vec<String>, LegacyParseError> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start();

    while !rest.is_empty() {
        let len = if let Some(quoted) = rest.strip_prefix('"') {
            match closing_quote(quoted) {
                Some(close) => close + 2,
                None => {
                    return Err(LegacyParseError::Parse {
                        line: line_no,
                        message: "No closing quotation".to_string(),
                    })
                }
            }
        } else {
            rest.find(char::is_whitespace).unwrap_or(rest.len())
        };
        tokens.push(rest[..len].to_string());
        rest = rest[len..].trim_start();
    }

    Ok(tokens)
}

/// Byte offset of the first `"` not escaped by a backslash.
fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

/// Spread `values` over `N` named slots (missing ones empty) and return the surplus.
fn take_tokens<const N: usize>(values: &[String]) -> ([String; N], Vec<String>) {
    let named = std::array::from_fn(|i| values.get(i).cloned().unwrap_or_default());
    let extra = values.iter().skip(N).cloned().collect();
    (named, extra)
}

impl Field {
    fn from_tokens(values: &[String]) -> Self {
        let ([id, value, orient, posx, posy, size, attributes, hjust, props, name], extra) =
            take_tokens::<10>(values);
        Field {
            id,
            value,
            orient,
            posx,
            posy,
            size,
            attributes,
            hjust,
            props,
            name,
            extra,
        }
    }

    /// Render the `F` line. The double space before `attributs` matches what
    /// eeschema writes.
    pub fn to_line(&self) -> String {
        let mut line = String::from("F");
        for (i, token) in [
            &self.id,
            &self.value,
            &self.orient,
            &self.posx,
            &self.posy,
            &self.size,
            &self.attributes,
            &self.hjust,
            &self.props,
            &self.name,
        ]
        .into_iter()
        .chain(self.extra.iter())
        .enumerate()
        {
            if i == 6 {
                line.push(' ');
            }
            line.push(' ');
            line.push_str(token);
        }
        line.trim().to_string()
    }
}

fn record_line<'a>(key: &str, tokens: impl IntoIterator<Item = &'a String>) -> String {
    let joined = tokens
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} {}", key, joined.trim())
}

impl Component {
    /// The block as file lines, `$Comp` through `$EndComp`, without terminators.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![COMP_START.to_string()];
        lines.push(record_line(
            "L",
            [&self.label.name, &self.label.reference]
                .into_iter()
                .chain(self.label.extra.iter()),
        ));
        lines.push(record_line(
            "U",
            [&self.unit.unit, &self.unit.convert, &self.unit.timestamp]
                .into_iter()
                .chain(self.unit.extra.iter()),
        ));
        lines.push(record_line(
            "P",
            [&self.position.x, &self.position.y]
                .into_iter()
                .chain(self.position.extra.iter()),
        ));
        lines.extend(self.alt_references.iter().cloned());
        lines.extend(self.fields.iter().map(Field::to_line));
        lines.extend(self.trailing.iter().cloned());
        lines.push(COMP_END.to_string());
        lines
    }

    /// The block as text with `\n` line endings.
    pub fn to_text(&self) -> String {
        let mut text = self.to_lines().join("\n");
        text.push('\n');
        text
    }
}
