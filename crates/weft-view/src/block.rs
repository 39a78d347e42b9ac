#![forbid(unsafe_code)]

//! Named output blocks with nested capture.
//!
//! A [`ViewBlock`] stores committed text per block name and keeps a stack
//! of open captures. `end` pops the innermost capture and appends it to
//! its block (creating the block if needed); `set` overwrites. Blocks are
//! string-only by construction.
//!
//! The block store never errors on imbalance itself: an `end` with no open
//! capture is a no-op, and whether a capture may stay open is a question
//! only the owner can answer (captures must not cross file boundaries,
//! which the view checks through [`unclosed`](ViewBlock::unclosed)).

use indexmap::IndexMap;

/// Named text blocks plus the stack of currently open captures.
#[derive(Debug, Default)]
pub struct ViewBlock {
    blocks: IndexMap<String, String>,
    active: Vec<Capture>,
}

#[derive(Debug)]
struct Capture {
    name: String,
    buffer: String,
}

impl ViewBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a capture for the named block. Text written while the capture
    /// is innermost is appended to the block on the matching [`end`].
    ///
    /// [`end`]: ViewBlock::end
    pub fn start(&mut self, name: impl Into<String>) {
        self.active.push(Capture {
            name: name.into(),
            buffer: String::new(),
        });
    }

    /// Close the innermost capture and append its text onto the block,
    /// creating the block if absent. No-op when no capture is open.
    pub fn end(&mut self) {
        if let Some(capture) = self.active.pop() {
            self.blocks
                .entry(capture.name)
                .or_default()
                .push_str(&capture.buffer);
        }
    }

    /// Append text directly onto the named block, creating it if absent.
    pub fn append(&mut self, name: impl Into<String>, text: &str) {
        self.blocks.entry(name.into()).or_default().push_str(text);
    }

    /// Overwrite the named block.
    pub fn set(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.blocks.insert(name.into(), text.into());
    }

    /// Stored content, or `""` for a block never committed.
    pub fn get(&self, name: &str) -> &str {
        self.blocks.get(name).map(String::as_str).unwrap_or("")
    }

    /// Remove a block, returning its content.
    pub fn take(&mut self, name: &str) -> String {
        self.blocks.shift_remove(name).unwrap_or_default()
    }

    /// Names of all blocks with committed content.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    /// Name of the innermost open capture.
    pub fn active(&self) -> Option<&str> {
        self.active.last().map(|c| c.name.as_str())
    }

    /// Names of all open captures, outermost first.
    pub fn unclosed(&self) -> Vec<&str> {
        self.active.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of open captures.
    pub fn open_captures(&self) -> usize {
        self.active.len()
    }

    /// Write raw text into the innermost open capture. No-op when no
    /// capture is open; the owner routes such writes elsewhere.
    pub fn write(&mut self, text: &str) {
        if let Some(capture) = self.active.last_mut() {
            capture.buffer.push_str(text);
        }
    }
}
