//! Data model for process graphs and their phase partition.
//!
//! - [`Element`] - a process step, typed by a closed [`ElementKind`]
//! - [`Flow`] - a directed sequence flow between two elements
//! - [`Phase`] - an ordered group of elements sized for one presentation unit

mod element;
mod flow;
mod phase;

pub use element::{Boundary, Element, ElementKind, UnknownElementKind};
pub use flow::Flow;
pub use phase::Phase;
