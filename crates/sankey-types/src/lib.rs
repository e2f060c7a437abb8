//! Core types and traits for the sankey flow pipeline.
//!
//! The output document matches the node/link JSON consumed by d3-sankey style renderers.

mod model;
mod traits;

pub use model::*;
pub use traits::*;
