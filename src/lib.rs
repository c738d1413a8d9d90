//! Bookshelf application library.
//!
//! Wires the document store, the books module, and the HTTP server together.

pub mod modules;

use anyhow::Context;
use axum::Router;
use bookshelf_db::Database;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Connected store plus the registry of modules built on it
pub struct Bootstrap {
    pub database: Database,
    pub registry: ModuleRegistry,
}

impl Bootstrap {
    /// Connect the store and register every module
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let database =
            Database::connect(&settings.database).context("failed to connect document store")?;

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &database, settings)?;

        Ok(Self { database, registry })
    }

    /// Router serving every registered module
    pub fn router(&self, settings: &Settings) -> Router {
        bookshelf_http::build_router(&self.registry, settings)
    }
}

/// Run the service until shutdown
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let app = Bootstrap::new(&settings)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    app.registry.init_all(&ctx).await?;
    app.registry.start_all(&ctx).await?;

    let served = bookshelf_http::start_server(&app.registry, &settings).await;

    app.registry.stop_all().await?;
    app.database.close();
    served
}
