#![forbid(unsafe_code)]

//! Collision-free DOM id generation for grouped inputs.
//!
//! A fresh [`IdPool`] is created per top-level render of a radio or
//! checkbox group and passed `&mut` through the option recursion, so nested
//! sub-groups share one de-duplication scope and two renders of the same
//! widget instance never interfere.

use std::collections::HashSet;

/// Lowercase a string and collapse non-alphanumeric runs into single `-`.
pub fn slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// De-duplicating id suffix pool, scoped to one top-level render call.
#[derive(Debug, Clone, Default)]
pub struct IdPool {
    used: HashSet<String>,
}

impl IdPool {
    /// Fresh pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a DOM id from a field name and option value: the slugified
    /// name, a dash, and a value-derived suffix made unique within this
    /// pool by appending a counter on collision.
    pub fn dom_id(&mut self, name: &str, value: &str) -> String {
        let prefix = slug(name);
        let base = slug(value);
        let mut candidate = base.clone();
        let mut n = 1;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{base}-{n}");
            n += 1;
        }
        if prefix.is_empty() {
            candidate
        } else if candidate.is_empty() {
            prefix
        } else {
            format!("{prefix}-{candidate}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_dashes() {
        assert_eq!(slug("Confirm Choice"), "confirm-choice");
        assert_eq!(slug("User[role]"), "user-role");
        assert_eq!(slug("--x--"), "x");
    }

    #[test]
    fn ids_are_prefixed_by_field_name() {
        let mut pool = IdPool::new();
        assert_eq!(pool.dom_id("Confirm", "y"), "confirm-y");
        assert_eq!(pool.dom_id("Confirm", "n"), "confirm-n");
    }

    #[test]
    fn duplicate_values_get_counters() {
        let mut pool = IdPool::new();
        assert_eq!(pool.dom_id("f", "a"), "f-a");
        assert_eq!(pool.dom_id("f", "a"), "f-a-1");
        assert_eq!(pool.dom_id("f", "a"), "f-a-2");
    }

    #[test]
    fn empty_value_still_produces_an_id() {
        let mut pool = IdPool::new();
        assert_eq!(pool.dom_id("f", ""), "f");
        // Second empty value collides on the empty suffix and gets a counter.
        assert_eq!(pool.dom_id("f", ""), "f--1");
    }
}
