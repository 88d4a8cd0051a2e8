//! String interning.
//!
//! The interner deduplicates identifier and literal text into small integer
//! handles so the rest of the pipeline compares names by id instead of by
//! string contents. One interner lives in the driver's [`Session`] and is
//! handed by reference to every phase; equal text always yields the same id.
//!
//! [`Session`]: crate::driver::Session

use std::collections::HashMap;

/// Opaque handle for an interned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(u32);

impl StringId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Deduplicating string table.
#[derive(Debug, Default)]
pub struct Interner {
    map: HashMap<String, StringId>,
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, returning the existing id if the text was seen before.
    pub fn intern(&mut self, text: &str) -> StringId {
        if let Some(&id) = self.map.get(text) {
            return id;
        }
        let id = StringId(self.strings.len() as u32);
        self.strings.push(text.to_string());
        self.map.insert(text.to_string(), id);
        id
    }

    /// Resolve an id back to its text.
    ///
    /// Valid for every id this interner issued; an unknown id resolves to the
    /// empty string rather than panicking inside a diagnostic path.
    pub fn resolve(&self, id: StringId) -> &str {
        self.strings.get(id.index()).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_idempotent() {
        let mut interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        let c = interner.intern("bar");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_resolve_round_trip() {
        let mut interner = Interner::new();
        let id = interner.intern("main");
        assert_eq!(interner.resolve(id), "main");
    }

    #[test]
    fn test_intern_after_resolve() {
        let mut interner = Interner::new();
        let a = interner.intern("x");
        let _ = interner.resolve(a);
        let b = interner.intern("x");
        assert_eq!(a, b);
    }
}
