//! Interactive editing session over one schematic.
//!
//! The CLI owns the input loop; this module turns one command line into an
//! operation on the loaded [`Schematic`] and hands back text to print.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::{OutputFormat, SchPartsError, SessionOptions};
use crate::fields::{FieldKind, FieldUpdate};
use crate::parser::schema::{Component, Schematic};

const HELP: &str = "\
Commands:
  help                         Show this help
  info                         File, component count and unsaved state
  list                         List components with reference, value and footprint
  groups                       Components grouped by value
  show <index>                 Print a component block as it will be saved
  normalize [<index>]          Add missing field slots (all components by default)
  set <index> key=value...     Set fields on one component
  update <value> key=value...  Set fields on every component with this value
  save [<path>]                Write changes, keeping the rest of the file intact
  reload                       Discard changes and read the file again
  quit | exit                  Leave the session

Field keys: footprint datasheet description manufacturer mpn supplier spn
Values with spaces need double quotes: description=\"Ceramic capacitor\"";

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Info,
    List,
    Groups,
    Show(usize),
    Normalize(Option<usize>),
    Set(usize, FieldUpdate),
    Update(String, FieldUpdate),
    Save(Option<PathBuf>),
    Reload,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, SchPartsError> {
        let words = split_words(line)?;
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (name.as_str(), args) {
            ("help" | "?", []) => Command::Help,
            ("info", []) => Command::Info,
            ("list" | "ls", []) => Command::List,
            ("groups", []) => Command::Groups,
            ("show", [index]) => Command::Show(parse_index(index)?),
            ("normalize", []) => Command::Normalize(None),
            ("normalize", [index]) => Command::Normalize(Some(parse_index(index)?)),
            ("set", [index, rest @ ..]) => Command::Set(parse_index(index)?, parse_update(rest)?),
            ("update", [value, rest @ ..]) => Command::Update(value.clone(), parse_update(rest)?),
            ("save", []) => Command::Save(None),
            ("save", [path]) => Command::Save(Some(PathBuf::from(path))),
            ("reload", []) => Command::Reload,
            ("quit" | "exit", []) => Command::Quit,
            (
                "help" | "?" | "info" | "list" | "ls" | "groups" | "show" | "normalize" | "set"
                | "update" | "save" | "reload" | "quit" | "exit",
                _,
            ) => {
                return Err(SchPartsError::InvalidCommand(format!(
                    "wrong arguments for '{}' (try 'help')",
                    name
                )))
            }
            _ => {
                return Err(SchPartsError::InvalidCommand(format!(
                    "unknown command '{}' (try 'help')",
                    name
                )))
            }
        };
        Ok(Some(command))
    }
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    Quit,
}

/// A loaded schematic plus the state of the editing session.
pub struct Session {
    schematic: Schematic,
    options: SessionOptions,
    dirty: bool,
}

impl Session {
    /// Load `path` and get a session ready for commands.
    pub fn open(path: &Path, options: SessionOptions) -> Result<Self, SchPartsError> {
        let mut schematic = Schematic::load(path)?;
        let mut dirty = false;
        if options.normalize_on_load {
            dirty = schematic.normalize_all()? > 0;
        }
        tracing::info!(
            "Opened {} with {} component(s)",
            path.display(),
            schematic.components.len()
        );
        Ok(Self {
            schematic,
            options,
            dirty,
        })
    }

    pub fn schematic(&self) -> &Schematic {
        &self.schematic
    }

    /// Mutable access for embedding code. The session is marked as modified.
    pub fn schematic_mut(&mut self) -> &mut Schematic {
        self.dirty = true;
        &mut self.schematic
    }

    /// Whether there are changes that have not been saved to the schematic file.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn banner(&self) -> String {
        format!(
            "Loaded {} ({} component(s))\n\
             Operations: normalize, set, update, groups, save (type 'help' for details)",
            self.schematic.filename.display(),
            self.schematic.components.len()
        )
    }

    /// Parse and run one command line.
    pub fn execute(&mut self, line: &str) -> Result<Outcome, SchPartsError> {
        match Command::parse(line)? {
            Some(command) => self.run(command),
            None => Ok(Outcome::Output(String::new())),
        }
    }

    pub fn run(&mut self, command: Command) -> Result<Outcome, SchPartsError> {
        let output = match command {
            Command::Help => HELP.to_string(),
            Command::Info => self.info(),
            Command::List => self.list(),
            Command::Groups => self.groups(),
            Command::Show(index) => self.component(index)?.to_text(),
            Command::Normalize(None) => {
                let added = self.schematic.normalize_all()?;
                self.dirty |= added > 0;
                format!("Added {} field slot(s)", added)
            }
            Command::Normalize(Some(index)) => {
                let added = self.component_mut(index)?.normalize_fields()?;
                self.dirty |= added > 0;
                format!("Added {} field slot(s)", added)
            }
            Command::Set(index, update) => {
                require_values(&update)?;
                let component = self.component_mut(index)?;
                component.set_fields(&update)?;
                let reference = component.reference().to_string();
                self.dirty = true;
                format!("Updated {}", reference)
            }
            Command::Update(value, update) => {
                require_values(&update)?;
                let count = self.schematic.update_component_group(&value, &update)?;
                self.dirty = true;
                format!("Updated {} component(s)", count)
            }
            Command::Save(path) => self.save(path)?,
            Command::Reload => {
                self.schematic.reload()?;
                self.dirty = false;
                format!("Reloaded {}", self.schematic.filename.display())
            }
            Command::Quit => {
                if self.dirty {
                    tracing::warn!("Leaving with unsaved changes");
                }
                return Ok(Outcome::Quit);
            }
        };
        Ok(Outcome::Output(output))
    }

    fn component(&self, index: usize) -> Result<&Component, SchPartsError> {
        let count = self.schematic.components.len();
        self.schematic
            .components
            .get(index)
            .ok_or(SchPartsError::ComponentIndex { index, count })
    }

    fn component_mut(&mut self, index: usize) -> Result<&mut Component, SchPartsError> {
        let count = self.schematic.components.len();
        self.schematic
            .components
            .get_mut(index)
            .ok_or(SchPartsError::ComponentIndex { index, count })
    }

    fn save(&mut self, path: Option<PathBuf>) -> Result<String, SchPartsError> {
        let target = path
            .or_else(|| self.options.output.clone())
            .unwrap_or_else(|| self.schematic.filename.clone());
        self.schematic.save_inline(Some(target.as_path()))?;
        if same_file(&target, &self.schematic.filename) {
            self.dirty = false;
        }
        Ok(format!(
            "Saved {} component(s) to {}",
            self.schematic.components.len(),
            target.display()
        ))
    }

    fn info(&self) -> String {
        let normalized = self
            .schematic
            .components
            .iter()
            .filter(|c| c.is_normalized())
            .count();
        format!(
            "File:        {}\nFormat:      {}\nComponents:  {} ({} normalized)\nGroups:      {}\nUnsaved:     {}",
            self.schematic.filename.display(),
            self.schematic.version.as_deref().unwrap_or("unknown"),
            self.schematic.components.len(),
            normalized,
            self.schematic.component_groups().len(),
            if self.dirty { "yes" } else { "no" }
        )
    }

    fn list(&self) -> String {
        let components = &self.schematic.components;
        match self.options.format {
            OutputFormat::Human => {
                let mut out = String::new();
                for (i, c) in components.iter().enumerate() {
                    let footprint = c.field(FieldKind::Footprint).map(|f| f.text()).unwrap_or("");
                    let _ = writeln!(out, "{:>4}  {:<10} {:<16} {}", i, c.reference(), c.value(), footprint);
                }
                out.trim_end().to_string()
            }
            OutputFormat::Json => {
                let rows: Vec<ListRow> = components
                    .iter()
                    .enumerate()
                    .map(|(index, c)| ListRow {
                        index,
                        reference: c.reference(),
                        value: c.value(),
                        fields: c.fields.iter().map(|f| (f.display_name(), f.text())).collect(),
                    })
                    .collect();
                to_json(&rows)
            }
        }
    }

    fn groups(&self) -> String {
        let groups = self.schematic.component_groups();
        match self.options.format {
            OutputFormat::Human => {
                let mut out = String::new();
                for (value, members) in &groups {
                    let refs: Vec<&str> = members.iter().map(|c| c.reference()).collect();
                    let _ = writeln!(out, "{} ({}): {}", value, members.len(), refs.join(", "));
                }
                out.trim_end().to_string()
            }
            OutputFormat::Json => {
                let rows: Vec<GroupRow> = groups
                    .iter()
                    .map(|(value, members)| GroupRow {
                        value,
                        count: members.len(),
                        references: members.iter().map(|c| c.reference()).collect(),
                    })
                    .collect();
                to_json(&rows)
            }
        }
    }
}

/// One component in `list` JSON output. Fields keep slot order.
#[derive(Serialize)]
struct ListRow<'a> {
    index: usize,
    reference: &'a str,
    value: &'a str,
    fields: IndexMap<&'a str, &'a str>,
}

/// One value group in `groups` JSON output.
#[derive(Serialize)]
struct GroupRow<'a> {
    value: &'a str,
    count: usize,
    references: Vec<&'a str>,
}

fn to_json<T: Serialize>(rows: &[T]) -> String {
    serde_json::to_string_pretty(rows).unwrap_or_else(|e| format!("JSON error: {}", e))
}

/// Whether two paths name the same file, resolving `.`/`..` and symlinks when possible.
fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn require_values(update: &FieldUpdate) -> Result<(), SchPartsError> {
    if update.is_empty() {
        return Err(SchPartsError::InvalidCommand(
            "no field values given (use key=value)".to_string(),
        ));
    }
    Ok(())
}

fn parse_index(word: &str) -> Result<usize, SchPartsError> {
    word.parse()
        .map_err(|_| SchPartsError::InvalidCommand(format!("'{}' is not a component index", word)))
}

fn parse_update(args: &[String]) -> Result<FieldUpdate, SchPartsError> {
    let mut update = FieldUpdate::new();
    for arg in args {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            SchPartsError::InvalidCommand(format!("expected key=value, got '{}'", arg))
        })?;
        update.set_by_key(key, value)?;
    }
    Ok(update)
}

/// Split on whitespace; double quotes group words and are removed.
fn split_words(line: &str) -> Result<Vec<String>, SchPartsError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quote = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quote = !in_quote;
                in_word = true;
            }
            c if c.is_whitespace() && !in_quote => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_quote {
        return Err(SchPartsError::InvalidCommand("unterminated quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
