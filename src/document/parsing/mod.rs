//! Document parsing utilities
//!
//! This module contains the XML walking and rendering steps that take a
//! document part to cards.

pub(crate) mod body;
pub mod formatting;
pub mod list;
pub mod relationships;
pub mod table;
pub(crate) mod xml;
