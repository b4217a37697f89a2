use std::collections::BTreeSet;

use super::evaluate::Bindings;

/// Sample counter, ticking at the formula's base rate.
pub const SAMPLE_COUNTER: &str = "t";
/// Tempo-relative counter, ticking a fixed number of times per beat.
pub const TEMPO_COUNTER: &str = "T";
/// User-adjustable macro values.
pub const MACROS: [&str; 4] = ["w", "x", "y", "z"];

/// The names a formula is allowed to reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableNamespace {
    names: BTreeSet<String>,
}

impl VariableNamespace {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        VariableNamespace {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn standard() -> Self {
        let counters = [TEMPO_COUNTER, SAMPLE_COUNTER];
        Self::new(counters.into_iter().chain(MACROS))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Zero-filled bindings for every name, `block_len` samples long.
    pub fn zeroed_bindings(&self, block_len: usize) -> Bindings {
        self.iter().map(|name| (name.to_owned(), vec![0; block_len])).collect()
    }
}

impl Default for VariableNamespace {
    fn default() -> Self {
        Self::standard()
    }
}
