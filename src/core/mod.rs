//! Core engine: store I/O, extraction, caching, scanning, and the import
//! graph, orchestrated by [`engine::Engine`].

pub mod cache;
pub mod engine;
pub mod extract;
pub mod graph;
pub mod matcher;
pub mod placeholder;
pub mod scanner;
pub mod store;
pub mod tree;
