#![forbid(unsafe_code)]

//! Render lifecycle events.
//!
//! The view dispatches hooks at fixed points in a render pass:
//! `before_render`/`after_render` around the whole pass,
//! `before_render_file`/`after_render_file` around every evaluated file,
//! and `before_layout`/`after_layout` around the layout. Dispatch is a
//! plain in-order loop over attached listeners; helpers are listeners too.

use std::path::Path;

/// Render lifecycle hooks; every hook defaults to a no-op.
pub trait ViewListener {
    /// Fired once before the view file is evaluated.
    fn before_render(&mut self, path: &Path) {
        let _ = path;
    }

    /// Fired once after the view content (including any extend chain) is
    /// committed to the `content` block.
    fn after_render(&mut self, path: &Path) {
        let _ = path;
    }

    /// Fired before each individual file evaluation.
    fn before_render_file(&mut self, path: &Path) {
        let _ = path;
    }

    /// Fired after each individual file evaluation; the returned string
    /// replaces the file's output, so listeners may rewrite content.
    fn after_render_file(&mut self, path: &Path, content: String) -> String {
        let _ = path;
        content
    }

    /// Fired before the layout file is evaluated.
    fn before_layout(&mut self, path: &Path) {
        let _ = path;
    }

    /// Fired after the layout file is evaluated.
    fn after_layout(&mut self, path: &Path) {
        let _ = path;
    }
}
