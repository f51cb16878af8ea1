//! Writing in-memory components back into the schematic they were read from.
//!
//! Only `$Comp` blocks are regenerated. Every other line is copied from the file
//! on disk, so headers, wires, sheets and the footer keep their exact bytes.

use std::io::Write;
use std::path::Path;

use crate::core::SchPartsError;
use crate::parser::kicad_legacy::{COMP_END, COMP_START};
use crate::parser::schema::Schematic;

impl Schematic {
    /// Save component changes without reordering the file.
    ///
    /// Reads `self.filename` and writes to `output`, or back to `self.filename`
    /// when `output` is `None`. Blocks are matched to components by position, so
    /// the block count on disk must equal `self.components.len()`.
    ///
    /// Every block is re-rendered, changed or not. eeschema left-pads coordinates
    /// and sizes to three columns (`%-3d`) while the renderer joins tokens with
    /// one space plus one extra before the attributes. Lines eeschema wrote with a
    /// size of 100 or more, or a coordinate under 100, therefore come back with
    /// different spacing after a save without edits. KiCad reads both forms.
    ///
    /// The file is replaced atomically. An existing destination keeps its
    /// permissions, and a symlinked destination is written through the link.
    pub fn save_inline(&self, output: Option<&Path>) -> Result<(), SchPartsError> {
        let target = output.unwrap_or(self.filename.as_path());

        let original = std::fs::read_to_string(&self.filename)
            .map_err(|e| SchPartsError::io(&self.filename, e))?;
        let updated = self.splice_components(&original)?;

        write_atomic(target, &updated, &self.filename)?;

        tracing::info!(
            "Saved {} component(s) to {}",
            self.components.len(),
            target.display()
        );
        Ok(())
    }

    /// Replace each component block of `original` with the rendered component at
    /// the same position.
    pub fn splice_components(&self, original: &str) -> Result<String, SchPartsError> {
        let in_file = count_blocks(original)?;
        if in_file != self.components.len() {
            return Err(SchPartsError::ComponentCountMismatch {
                in_file,
                in_memory: self.components.len(),
            });
        }

        let mut out = String::with_capacity(original.len());
        let mut in_component = false;
        let mut components = self.components.iter();

        for line in original.split_inclusive('\n') {
            let (text, ending) = split_line_ending(line);
            if in_component {
                if text == COMP_END {
                    in_component = false;
                }
            } else if text == COMP_START {
                in_component = true;
                // count_blocks guarantees one component per block
                if let Some(component) = components.next() {
                    for rendered in component.to_lines() {
                        out.push_str(&rendered);
                        out.push_str(if ending.is_empty() { "\n" } else { ending });
                    }
                }
            } else {
                out.push_str(line);
            }
        }

        Ok(out)
    }
}

/// Count component blocks, failing on a block that never closes.
fn count_blocks(content: &str) -> Result<usize, SchPartsError> {
    let mut count = 0;
    let mut open_line = None;

    for (i, line) in content.lines().enumerate() {
        match open_line {
            Some(_) if line == COMP_END => open_line = None,
            Some(_) => {}
            None if line == COMP_START => {
                open_line = Some(i + 1);
                count += 1;
            }
            None => {}
        }
    }

    match open_line {
        Some(line) => Err(SchPartsError::UnterminatedComponent { line }),
        None => Ok(count),
    }
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(text) = line.strip_suffix("\r\n") {
        (text, "\r\n")
    } else if let Some(text) = line.strip_suffix('\n') {
        (text, "\n")
    } else {
        (line, "")
    }
}

/// Write through a temporary file in the target directory and rename it into
/// place, so a failed save leaves the old file intact.
fn write_atomic(target: &Path, content: &str, like: &Path) -> Result<(), SchPartsError> {
    let target = std::fs::canonicalize(target).unwrap_or_else(|_| target.to_path_buf());
    let target = target.as_path();
    // a new file takes the source schematic's mode
    let permissions = std::fs::metadata(target)
        .or_else(|_| std::fs::metadata(like))
        .map(|m| m.permissions())
        .ok();

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| SchPartsError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| SchPartsError::io(tmp.path(), e))?;
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| SchPartsError::io(tmp.path(), e))?;
    }
    tmp.persist(target)
        .map_err(|e| SchPartsError::io(target, e.error))?;
    Ok(())
}
