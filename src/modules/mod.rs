pub mod books;

use std::sync::Arc;

use anyhow::Context;
use bookshelf_db::Database;
use bookshelf_kernel::{settings::Settings, ModuleRegistry};

use books::store::DocumentBookStore;

/// Register all project-specific modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    database: &Database,
    settings: &Settings,
) -> anyhow::Result<()> {
    let store = DocumentBookStore::open(database, &settings.database.collection)
        .context("failed to open book store")?;
    registry.register(books::create_module(Arc::new(store)));
    Ok(())
}
