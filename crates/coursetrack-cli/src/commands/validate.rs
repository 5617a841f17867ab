//! The `coursetrack validate` command.

use std::path::PathBuf;

use anyhow::Result;

use coursetrack_core::config::load_config_from;
use coursetrack_core::parser::{load_catalog_directory, parse_catalog, validate_catalog};

pub fn execute(config_path: Option<PathBuf>, catalog_path: Option<PathBuf>) -> Result<()> {
    let catalog_path = match catalog_path {
        Some(path) => path,
        None => load_config_from(config_path.as_deref())?.catalog,
    };

    let catalogs = if catalog_path.is_dir() {
        load_catalog_directory(&catalog_path)?
    } else {
        vec![parse_catalog(&catalog_path)?]
    };

    let mut total_warnings = 0;

    for catalog in &catalogs {
        println!(
            "Course: {} v{} ({} modules, {} lessons)",
            catalog.title,
            catalog.version,
            catalog.modules.len(),
            catalog.lesson_count()
        );

        let warnings = validate_catalog(catalog);
        for w in &warnings {
            let prefix = w
                .module_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All catalogs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
