//! Command implementations for the aligntree CLI

pub mod align;
pub mod config;
