use std::path::PathBuf;

/// A loaded legacy schematic: its components in file order plus the file they came from.
#[derive(Debug, Clone)]
pub struct Schematic {
    pub filename: PathBuf,
    pub version: Option<String>,
    pub components: Vec<Component>,
}

/// One `$Comp` ... `$EndComp` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub label: LabelLine,
    pub unit: UnitLine,
    pub position: PositionLine,
    /// `AR Path=... Ref=... Part=...` lines, kept as written.
    pub alt_references: Vec<String>,
    pub fields: Vec<Field>,
    /// Tab-indented legacy lines and anything else the reader does not recognise.
    pub trailing: Vec<String>,
}

/// `L <lib name> <reference>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelLine {
    pub name: String,
    pub reference: String,
    pub extra: Vec<String>,
}

/// `U <unit> <convert> <timestamp>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitLine {
    pub unit: String,
    pub convert: String,
    pub timestamp: String,
    pub extra: Vec<String>,
}

/// `P <x> <y>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionLine {
    pub x: String,
    pub y: String,
    pub extra: Vec<String>,
}

/// `F <id> "<value>" <orient> <x> <y> <size>  <attributs> <hjust> <props> "<name>"`
///
/// Every attribute is kept as the raw token so an untouched field renders back
/// byte-for-byte. `value` and `name` carry their surrounding quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub id: String,
    pub value: String,
    pub orient: String,
    pub posx: String,
    pub posy: String,
    pub size: String,
    pub attributes: String,
    pub hjust: String,
    pub props: String,
    pub name: String,
    pub extra: Vec<String>,
}
