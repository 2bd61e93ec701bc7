//! Gloss - translation consistency checker for JS/TS projects
//!
//! Gloss is a CLI tool and library for keeping per-locale JSON translation
//! files consistent with how translation keys are actually referenced in
//! application source code. It detects missing translations, orphan keys,
//! malformed key names, placeholder/plural mismatches between locales, and
//! hardcoded text in JSX.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands)
//! - `config`: Configuration file loading and parsing
//! - `core`: Core engine (store I/O, extraction, caching, scanning, graph)
//! - `issues`: Issue type definitions and reporting
//! - `rules`: Detection rules for the consistency checker
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod rules;
pub mod utils;
