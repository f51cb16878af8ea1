//! Canonical field table, value sanitizing and per-component field editing.

use std::fmt;

use crate::core::SchPartsError;
use crate::parser::schema::{Component, Field};

/// Field names every normalized component carries, in slot order.
pub const FIELD_NAMES: [&str; 9] = [
    "Reference",
    "Value",
    "Footprint",
    "Datasheet",
    "Description",
    "Manufacturer",
    "Manufacturer Part Number",
    "Supplier",
    "Supplier Part Number",
];

/// A canonical field slot. The discriminant is the slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Reference = 0,
    Value = 1,
    Footprint = 2,
    Datasheet = 3,
    Description = 4,
    Manufacturer = 5,
    ManufacturerPartNumber = 6,
    Supplier = 7,
    SupplierPartNumber = 8,
}

impl FieldKind {
    pub const ALL: [FieldKind; 9] = [
        FieldKind::Reference,
        FieldKind::Value,
        FieldKind::Footprint,
        FieldKind::Datasheet,
        FieldKind::Description,
        FieldKind::Manufacturer,
        FieldKind::ManufacturerPartNumber,
        FieldKind::Supplier,
        FieldKind::SupplierPartNumber,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        FIELD_NAMES[self.index()]
    }

    /// Look up a slot by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        FIELD_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self::ALL[i])
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Make sure `value` is double-quoted. Already-quoted text is returned as is;
/// embedded quotes are not escaped.
pub fn sanitize_value(value: impl fmt::Display) -> String {
    let value = value.to_string();
    if value.starts_with('"') {
        value
    } else {
        format!("\"{}\"", value)
    }
}

/// Values to write with [`Component::set_fields`]. `None` and empty strings leave
/// the slot alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUpdate {
    pub footprint: Option<String>,
    pub datasheet: Option<String>,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub mpn: Option<String>,
    pub supplier: Option<String>,
    pub spn: Option<String>,
}

impl FieldUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn footprint(mut self, value: impl Into<String>) -> Self {
        self.footprint = Some(value.into());
        self
    }

    pub fn datasheet(mut self, value: impl Into<String>) -> Self {
        self.datasheet = Some(value.into());
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    pub fn manufacturer(mut self, value: impl Into<String>) -> Self {
        self.manufacturer = Some(value.into());
        self
    }

    pub fn mpn(mut self, value: impl Into<String>) -> Self {
        self.mpn = Some(value.into());
        self
    }

    pub fn supplier(mut self, value: impl Into<String>) -> Self {
        self.supplier = Some(value.into());
        self
    }

    pub fn spn(mut self, value: impl Into<String>) -> Self {
        self.spn = Some(value.into());
        self
    }

    /// Set a parameter by its short command key (`footprint`, `mpn`, `spn`, ...).
    pub fn set_by_key(&mut self, key: &str, value: impl Into<String>) -> Result<(), SchPartsError> {
        let slot = match key {
            "footprint" => &mut self.footprint,
            "datasheet" => &mut self.datasheet,
            "description" => &mut self.description,
            "manufacturer" => &mut self.manufacturer,
            "mpn" => &mut self.mpn,
            "supplier" => &mut self.supplier,
            "spn" => &mut self.spn,
            other => return Err(SchPartsError::UnknownField(other.to_string())),
        };
        *slot = Some(value.into());
        Ok(())
    }

    /// The supplied parameters paired with the slot they target.
    pub fn entries(&self) -> Vec<(FieldKind, &str)> {
        [
            (FieldKind::Footprint, &self.footprint),
            (FieldKind::Datasheet, &self.datasheet),
            (FieldKind::Description, &self.description),
            (FieldKind::Manufacturer, &self.manufacturer),
            (FieldKind::ManufacturerPartNumber, &self.mpn),
            (FieldKind::Supplier, &self.supplier),
            (FieldKind::SupplierPartNumber, &self.spn),
        ]
        .into_iter()
        .filter_map(|(kind, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((kind, v)),
            _ => None,
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Field {
    /// The value without its surrounding quotes.
    pub fn text(&self) -> &str {
        unquote(&self.value)
    }

    /// The explicit name, or the implicit one KiCad uses for ids 0 to 3.
    pub fn display_name(&self) -> &str {
        let name = unquote(&self.name);
        if !name.is_empty() {
            return name;
        }
        match self.id.parse::<usize>() {
            Ok(id) if id < FieldKind::Description.index() => FIELD_NAMES[id],
            _ => "",
        }
    }
}

fn unquote(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

impl Component {
    pub fn field(&self, kind: FieldKind) -> Option<&Field> {
        self.fields.get(kind.index())
    }

    pub fn reference(&self) -> &str {
        self.field(FieldKind::Reference)
            .map(Field::text)
            .unwrap_or(self.label.reference.as_str())
    }

    pub fn value(&self) -> &str {
        self.field(FieldKind::Value).map(Field::text).unwrap_or("")
    }

    pub fn is_normalized(&self) -> bool {
        self.fields.len() >= FIELD_NAMES.len()
    }

    /// Append any missing canonical slots, copying placement from the last field.
    ///
    /// Returns how many slots were added.
    pub fn normalize_fields(&mut self) -> Result<usize, SchPartsError> {
        let template = match self.fields.last() {
            Some(field) => field.clone(),
            None => {
                return Err(SchPartsError::MalformedComponent(
                    self.label.reference.clone(),
                ))
            }
        };

        let start = self.fields.len();
        for (i, name) in FIELD_NAMES.iter().enumerate().skip(start) {
            let mut field = template.clone();
            field.value = sanitize_value("");
            field.id = i.to_string();
            field.name = sanitize_value(name);
            self.fields.push(field);
        }

        let added = self.fields.len() - start;
        if added > 0 {
            tracing::debug!(
                "Added {} field slot(s) to {}",
                added,
                self.label.reference
            );
        }
        Ok(added)
    }

    /// Normalize, then write every supplied value of `update` into its slot.
    pub fn set_fields(&mut self, update: &FieldUpdate) -> Result<(), SchPartsError> {
        self.normalize_fields()?;
        for (kind, value) in update.entries() {
            let count = self.fields.len();
            let field = self
                .fields
                .get_mut(kind.index())
                .ok_or(SchPartsError::ComponentIndex {
                    index: kind.index(),
                    count,
                })?;
            field.value = sanitize_value(value);
        }
        Ok(())
    }
}
