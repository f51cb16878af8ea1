//! Fill in manufacturer data for every component with a given value.
//!
//! Usage: cargo run --example bulk_update -- <file.sch> <value> <manufacturer> <mpn>

use schparts::prelude::*;
use std::path::Path;

fn main() -> Result<(), SchPartsError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [file, value, manufacturer, mpn] = args.as_slice() else {
        eprintln!("usage: bulk_update <file.sch> <value> <manufacturer> <mpn>");
        std::process::exit(2);
    };

    let mut schematic = Schematic::load(Path::new(file))?;
    let update = FieldUpdate::new()
        .manufacturer(manufacturer.as_str())
        .mpn(mpn.as_str());
    let count = schematic.update_component_group(value, &update)?;
    schematic.save_inline(None)?;

    println!("Updated {} component(s) with value {}", count, sanitize_value(value));
    Ok(())
}
