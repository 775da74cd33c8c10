//! Terminal UI for browsing classification results.

pub mod components;
pub mod runtime;
pub mod theme;
