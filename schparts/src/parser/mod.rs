pub mod schema;
pub mod kicad_legacy;
pub mod format_detector;

// Re-export for convenience
pub use schema::*;
pub use kicad_legacy::{LegacyParseError, LegacyParser, COMP_END, COMP_START};
pub use format_detector::{detect_format, SchematicFormat};
