//! Library exports for the CLI, benchmarks and integration tests.
/// Application directory resolution.
pub mod app_dirs;
/// Analysis backend client.
pub mod backend;
/// Benchmark tables and editorial decisions.
pub mod catalog;
/// TOML-backed application configuration.
pub mod config;
/// Composition of catalogs, view state and upload session.
pub mod dashboard;
/// Shared HTTP agent and retry helpers.
pub mod http_client;
/// Tracing subscriber setup and log file rotation.
pub mod logging;
/// Best-algorithm ranking and chart normalization.
pub mod scoring;
/// Upload lifecycle state machine.
pub mod session;
/// TuSimple-format lane annotations.
pub mod tusimple;
/// Selector state and derivations.
pub mod view;
