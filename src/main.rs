//! # Taipan Viewer - CPU benchmark results from MongoDB
//!
//! Connects to the deployment, pings it, and prints every document in
//! `taipan_benchmarks.cpu_benchmarks`. `serve` exposes the same data over HTTP.
//!
//! ## Environment Variables
//!
//! - `MONGODB_URI` (or `DATABASE_URL` / `MONGODB_URL`): MongoDB connection string
//! - `RUST_LOG`: log filter (default `info`)

use env_logger::Env;

pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod render;
pub mod server;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = cli::handle_cli(cli::cli().get_matches()).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
