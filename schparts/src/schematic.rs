//! Loading a schematic and the value-group operations on it.

use std::path::Path;

use indexmap::IndexMap;

use crate::core::SchPartsError;
use crate::fields::{sanitize_value, FieldUpdate};
use crate::parser::format_detector::detect_format;
use crate::parser::kicad_legacy::LegacyParser;
use crate::parser::schema::{Component, Schematic};

impl Schematic {
    /// Read and parse a legacy schematic from disk.
    pub fn load(path: &Path) -> Result<Self, SchPartsError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SchPartsError::io(path, e))?;

        if let Some(format) = detect_format(&content) {
            if !format.is_legacy() {
                return Err(SchPartsError::UnsupportedFormat(format!(
                    "{} is a {} schematic; only legacy EESchema files can be edited",
                    path.display(),
                    format.as_str()
                )));
            }
        }

        let mut schematic =
            LegacyParser::parse_legacy_schematic(&content, &path.to_string_lossy())?;
        schematic.filename = path.to_path_buf();
        Ok(schematic)
    }

    /// Discard in-memory changes and read the file again.
    pub fn reload(&mut self) -> Result<(), SchPartsError> {
        *self = Self::load(&self.filename)?;
        Ok(())
    }

    /// Normalize every component. Returns the number of slots added.
    ///
    /// Nothing is changed when any component has no fields.
    pub fn normalize_all(&mut self) -> Result<usize, SchPartsError> {
        ensure_fields(self.components.iter())?;
        self.components
            .iter_mut()
            .map(Component::normalize_fields)
            .sum()
    }

    /// Components grouped by their quoted value, in order of first appearance.
    pub fn component_groups(&self) -> IndexMap<String, Vec<&Component>> {
        let mut groups: IndexMap<String, Vec<&Component>> = IndexMap::new();
        for component in &self.components {
            groups
                .entry(group_key(component))
                .or_default()
                .push(component);
        }
        groups
    }

    /// Apply `update` to every component whose value is `value`.
    ///
    /// Returns how many components were updated. Nothing is changed when the group
    /// does not exist or one of its members has no fields.
    pub fn update_component_group(
        &mut self,
        value: &str,
        update: &FieldUpdate,
    ) -> Result<usize, SchPartsError> {
        let key = sanitize_value(value);
        let members: Vec<usize> = self
            .components
            .iter()
            .enumerate()
            .filter(|(_, c)| group_key(c) == key)
            .map(|(i, _)| i)
            .collect();

        if members.is_empty() {
            tracing::warn!("No component group for value {}", key);
            return Err(SchPartsError::NoSuchGroup(key));
        }
        ensure_fields(members.iter().map(|i| &self.components[*i]))?;

        for i in &members {
            self.components[*i].set_fields(update)?;
        }

        tracing::info!("Updated {} component(s) with value {}", members.len(), key);
        Ok(members.len())
    }
}

/// Fail with the first component that has no field to copy placement from.
fn ensure_fields<'a>(
    mut components: impl Iterator<Item = &'a Component>,
) -> Result<(), SchPartsError> {
    match components.find(|c| c.fields.is_empty()) {
        Some(bad) => {
            tracing::warn!("Component {} has no fields", bad.label.reference);
            Err(SchPartsError::MalformedComponent(bad.label.reference.clone()))
        }
        None => Ok(()),
    }
}

fn group_key(component: &Component) -> String {
    let value = component
        .fields
        .get(crate::fields::FieldKind::Value.index())
        .map(|f| f.value.as_str())
        .unwrap_or("");
    sanitize_value(value)
}
