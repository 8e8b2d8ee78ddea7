// src/application/mod.rs
//
// Application layer: wires the database, the event bus and the services
// into one handle a host (HTTP server, CLI, desktop shell) can share.

pub mod state;

pub use state::AppState;
