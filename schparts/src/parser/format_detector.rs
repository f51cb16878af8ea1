//! KiCad Schematic Format Detection
//!
//! Only the legacy EESchema text format (KiCad 4-5) has `$Comp` blocks that can be
//! edited in place. Modern S-expression schematics are recognised so they can be
//! refused with a clear message.

/// KiCad schematic format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchematicFormat {
    /// KiCad 4 - Legacy text format
    Legacy4,
    /// KiCad 5 - Legacy text format
    Legacy5,
    /// KiCad 6+ - S-expression format
    Modern,
}

impl SchematicFormat {
    /// Get version string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            SchematicFormat::Legacy4 => "KiCad 4",
            SchematicFormat::Legacy5 => "KiCad 5",
            SchematicFormat::Modern => "KiCad 6+",
        }
    }

    /// Check if this is a legacy format
    pub fn is_legacy(&self) -> bool {
        matches!(self, SchematicFormat::Legacy4 | SchematicFormat::Legacy5)
    }
}

/// Detect the schematic format from file content
pub fn detect_format(content: &str) -> Option<SchematicFormat> {
    let trimmed = content.trim_start();

    if let Some(rest) = trimmed.strip_prefix("EESchema Schematic File Version") {
        let version = rest.split_whitespace().next().unwrap_or("");
        if version == "4" {
            return Some(SchematicFormat::Legacy4);
        }
        // Default to Legacy5 if version string is present but not 4
        return Some(SchematicFormat::Legacy5);
    }

    if trimmed.starts_with("(kicad_sch") {
        return Some(SchematicFormat::Modern);
    }

    None
}
