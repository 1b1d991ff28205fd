//! Cross-crate integration flows.

pub mod fixtures;
mod flows;
mod runtime;
