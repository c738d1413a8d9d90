pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use store::BookStore;

/// Books catalog module
pub struct BooksModule {
    store: Arc<dyn BookStore>,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            collection = %ctx.settings.database.collection,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let text = |description: &str| {
            json!({
                "description": description,
                "content": { "text/plain": { "schema": { "type": "string" } } }
            })
        };
        let book_or_text = |schema: &str| {
            json!({
                "description": "Book, or a plain-text outcome such as `no book exists`",
                "content": {
                    "application/json": { "schema": { "$ref": format!("#/components/schemas/{schema}") } },
                    "text/plain": { "schema": { "type": "string" } }
                }
            })
        };
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "description": "24-character hexadecimal book id",
            "schema": { "type": "string" }
        }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every book with its comment count",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/BookSummary" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": { "schema": { "$ref": "#/components/schemas/CreateBook" } },
                                "application/x-www-form-urlencoded": { "schema": { "$ref": "#/components/schemas/CreateBook" } }
                            }
                        },
                        "responses": { "200": book_or_text("CreatedBook") }
                    },
                    "delete": {
                        "summary": "Delete every book",
                        "tags": ["Books"],
                        "responses": { "200": text("`complete delete successful`") }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book with its comments",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "responses": { "200": book_or_text("BookDetail") }
                    },
                    "post": {
                        "summary": "Append a comment",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "requestBody": {
                            "content": {
                                "application/json": { "schema": { "$ref": "#/components/schemas/AddComment" } },
                                "application/x-www-form-urlencoded": { "schema": { "$ref": "#/components/schemas/AddComment" } }
                            }
                        },
                        "responses": { "200": book_or_text("BookDetail") }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": { "200": text("`delete successful` or `no book exists`") }
                    }
                }
            },
            "components": {
                "schemas": {
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "commentCount": { "type": "integer" }
                        },
                        "required": ["id", "title", "commentCount"]
                    },
                    "BookDetail": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "comments": { "type": "array", "items": { "type": "string" } },
                            "commentCount": { "type": "integer" }
                        },
                        "required": ["id", "title", "comments", "commentCount"]
                    },
                    "CreatedBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "id": { "type": "string" }
                        },
                        "required": ["title", "id"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": { "title": { "type": "string" } }
                    },
                    "AddComment": {
                        "type": "object",
                        "properties": { "comment": { "type": "string" } }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
