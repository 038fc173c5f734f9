//! # HTTP viewer
//!
//! Read-only routes over the benchmark collection, mounted by `serve`.

use {
    mongodb::{Client, Collection, bson::Document},
    rocket::{Request, catch, get, serde::json::Json},
    serde_json::{Value, json},
};

pub mod benchmarks;
pub mod misc;

/// Shared driver client plus the names it should read from.
pub struct ViewerState {
    pub client: Client,
    pub database: String,
    pub collection: String,
}

impl ViewerState {
    pub fn new(client: Client, database: &str, collection: &str) -> Self {
        Self {
            client,
            database: database.to_string(),
            collection: collection.to_string(),
        }
    }

    pub fn documents(&self) -> Collection<Document> {
        self.client
            .database(&self.database)
            .collection(&self.collection)
    }
}

#[get("/")]
pub fn index() -> &'static str {
    "taipan-viewer: GET /cpu-benchmarks, /cpu-benchmarks/<cpu_model>, /misc/check-health"
}

fn error_body(status: u16, message: String) -> Json<Value> {
    Json(json!({
        "error": message,
        "status": status
    }))
}

#[catch(404)]
pub fn catch404(req: &Request) -> Json<Value> {
    error_body(404, format!("Nothing at {}", req.uri()))
}

#[catch(500)]
pub fn catch500(_: &Request) -> Json<Value> {
    error_body(500, "Internal server error".to_string())
}
