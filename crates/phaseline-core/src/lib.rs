//! Phaseline Core Types and Definitions
//!
//! This crate provides the foundational types shared by the phaseline graph
//! model and phase segmenter. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Externally supplied layout coordinates ([`geometry::Point`])
//! - **Model**: Process elements, flows and phases ([`model`] module)

pub mod geometry;
pub mod identifier;
pub mod model;
