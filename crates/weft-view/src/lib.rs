#![forbid(unsafe_code)]

//! View composition: blocks, template inheritance, elements, layouts.
//!
//! A [`View`] renders one named template through a pluggable
//! [`TemplateEngine`], routing template output into a [`ViewBlock`] store,
//! walking `extend` parent chains bottom-up, wrapping the result in a
//! layout, and dispatching lifecycle events to attached listeners and
//! helpers. Template files are resolved through a plugin/theme/app/core
//! path cascade ([`paths`]).
//!
//! Each `View` performs one render pass; create a fresh one per pass.

pub mod block;
pub mod cache;
pub mod engine;
pub mod events;
pub mod helpers;
pub mod inflect;
pub mod paths;
pub mod view;

pub use block::ViewBlock;
pub use cache::{ElementCache, MemoryCache};
pub use engine::{ClosureEngine, TemplateEngine};
pub use events::ViewListener;
pub use helpers::{EntityPath, Helper, HelperCollection};
pub use paths::{PathResolver, ViewPaths};
pub use view::{ElementCacheOptions, ElementOptions, RenderKind, Scope, View, ViewBuilder};

use std::path::PathBuf;
use weft_template::TemplateError;

/// Errors raised during a render pass.
#[derive(Debug)]
pub enum RenderError {
    /// No view file found in the cascade; carries the first path searched.
    MissingView { name: String, path: PathBuf },
    /// No element file found in the cascade.
    MissingElement { name: String, path: PathBuf },
    /// No layout file found in the cascade.
    MissingLayout { name: String, path: PathBuf },
    /// A file declared itself as its own parent.
    SelfExtend { path: PathBuf },
    /// Extending would close a cycle in the parent chain.
    ExtendCycle { path: PathBuf },
    /// A file left a block capture open across its boundary.
    UnclosedBlock { block: String },
    /// The template engine failed to evaluate a file.
    Engine { path: PathBuf, detail: String },
    /// A string-template substitution failed inside the engine.
    Template(TemplateError),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingView { name, path } => {
                write!(f, "view '{name}' not found, searched from {}", path.display())
            }
            Self::MissingElement { name, path } => {
                write!(
                    f,
                    "element '{name}' not found, searched from {}",
                    path.display()
                )
            }
            Self::MissingLayout { name, path } => {
                write!(
                    f,
                    "layout '{name}' not found, searched from {}",
                    path.display()
                )
            }
            Self::SelfExtend { path } => {
                write!(f, "template {} cannot extend itself", path.display())
            }
            Self::ExtendCycle { path } => {
                write!(
                    f,
                    "extending {} would create a cycle in the parent chain",
                    path.display()
                )
            }
            Self::UnclosedBlock { block } => {
                write!(f, "block '{block}' left open across a file boundary")
            }
            Self::Engine { path, detail } => {
                write!(f, "template engine failed on {}: {detail}", path.display())
            }
            Self::Template(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Template(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TemplateError> for RenderError {
    fn from(err: TemplateError) -> Self {
        Self::Template(err)
    }
}
