//! schparts - part field editing for legacy KiCad schematics
//!
//! Loads the `$Comp` blocks of a KiCad 4/5 `.sch` file, fills in the standard
//! BOM fields (footprint, datasheet, manufacturer, part numbers, ...) for single
//! components or for every component sharing a value, and writes the blocks back
//! without touching the rest of the file.
//!
//! # Quick Start
//!
//! ```no_run
//! use schparts::{FieldUpdate, Schematic};
//! use std::path::Path;
//!
//! let mut schematic = Schematic::load(Path::new("power.sch")).unwrap();
//!
//! let update = FieldUpdate::new().manufacturer("Murata").mpn("GRM155R71C104KA88D");
//! schematic.update_component_group("100nF", &update).unwrap();
//!
//! schematic.save_inline(None).unwrap();
//! ```
//!
//! For interactive use, [`Session`] wraps a loaded schematic and runs text
//! commands (`groups`, `update 100nF mpn=...`, `save`).

pub mod core;
pub mod fields;
pub mod parser;
pub mod save;
pub mod schematic;
pub mod session;

// Re-export main types
pub use crate::core::{OutputFormat, SchPartsError, SessionOptions};
pub use fields::{sanitize_value, FieldKind, FieldUpdate, FIELD_NAMES};
pub use parser::schema::{Component, Field, Schematic};
pub use parser::kicad_legacy::LegacyParser;
pub use session::{Command, Outcome, Session};

/// Load a schematic file (convenience wrapper).
pub fn load_schematic(path: &std::path::Path) -> Result<Schematic, SchPartsError> {
    Schematic::load(path)
}

/// Load `path` and start an editing session with default options.
pub fn open_session(path: &std::path::Path) -> Result<Session, SchPartsError> {
    Session::open(path, SessionOptions::default())
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        sanitize_value, Component, FieldKind, FieldUpdate, Outcome, SchPartsError, Schematic,
        Session, SessionOptions,
    };
}
