use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::Selector;
use crate::error::SelectorError;

/// Compiled selectors keyed by their pattern string.
///
/// Owned by one lint session and dropped with it, so nothing leaks between
/// runs of a long-lived host.
#[derive(Debug, Default)]
pub struct SelectorCache {
    compiled: FxHashMap<String, Arc<Selector>>,
}

impl SelectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern`, or return the selector compiled earlier for it.
    /// Failed compilations are not cached.
    pub fn get_or_compile(&mut self, pattern: &str) -> Result<Arc<Selector>, SelectorError> {
        if let Some(selector) = self.compiled.get(pattern) {
            return Ok(Arc::clone(selector));
        }
        let selector = Arc::new(Selector::compile(pattern)?);
        tracing::trace!(pattern, "compiled selector");
        self.compiled
            .insert(pattern.to_string(), Arc::clone(&selector));
        Ok(selector)
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    pub fn clear(&mut self) {
        self.compiled.clear();
    }
}
