//! Explicit naming context for generated identifiers.
//!
//! One context spans a whole compilation unit, so generated type names,
//! action constants and temporaries never collide across tables.

use rustc_hash::FxHashSet;

/// Hands out identifiers that are unique within one compilation unit.
#[derive(Clone, Debug, Default)]
pub struct NameContext {
    used: FxHashSet<String>,
}

impl NameContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as taken without generating anything.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.used.insert(name.into());
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// `base` if it is still free, otherwise `base_<n>` for the first free `n`.
    pub fn fresh(&mut self, base: &str) -> String {
        if self.used.insert(base.to_owned()) {
            return base.to_owned();
        }
        let mut n = 0u32;
        loop {
            let candidate = format!("{base}_{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Upper-cased, C-identifier-safe [`fresh`](Self::fresh) name for a macro.
    pub fn fresh_macro(&mut self, base: &str) -> String {
        let sanitized: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        self.fresh(&sanitized)
    }
}
