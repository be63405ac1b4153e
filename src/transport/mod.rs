//! Transport layer: widget endpoint client, response classification and CLI entry points

pub mod classifier;
pub mod cli;
pub mod rest;

pub use classifier::{classify, WidgetPayload};
pub use rest::{RestClient, WidgetSource};
