#![forbid(unsafe_code)]

//! String templates, HTML escaping, and attribute serialization.
//!
//! This crate provides the formatting substrate for every widget and for
//! text-backed template engines: a named set of `{{placeholder}}` templates
//! ([`StringTemplate`]), entity escaping ([`escape`]), and loose-value HTML
//! attribute serialization with an explicit minimized-attribute set.

pub mod attributes;
pub mod escape;
pub mod template;

pub use attributes::{AttrMap, AttributeFormatter, DEFAULT_MINIMIZED};
pub use template::{StringTemplate, TemplateError, TemplateVars};
