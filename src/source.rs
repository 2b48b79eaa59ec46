//! Key-value sources consulted by the environment selector.
//!
//! Lookups go through [`KeyValueSource`]. The default chain is the
//! process-wide [`Overlay`] followed by the process environment; an empty
//! value counts as absent at every layer.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;

pub trait KeyValueSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory overlay consulted before the process environment.
#[derive(Debug, Default)]
pub struct Overlay {
    entries: RwLock<HashMap<String, String>>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        // a poisoned lock still holds a usable map
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.into(), value.into());
    }
    pub fn remove(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key)
    }
    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueSource for Overlay {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

impl KeyValueSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Process environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl KeyValueSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// First non-empty answer wins.
#[derive(Default, Clone)]
pub struct Layered {
    layers: Vec<Arc<dyn KeyValueSource>>,
}

impl Layered {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with(mut self, layer: Arc<dyn KeyValueSource>) -> Self {
        self.layers.push(layer);
        self
    }
}

impl KeyValueSource for Layered {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }
}

lazy_static! {
    static ref GLOBAL_OVERLAY: Arc<Overlay> = Arc::new(Overlay::new());
}

/// The process-wide overlay store.
pub fn global_overlay() -> Arc<Overlay> {
    Arc::clone(&GLOBAL_OVERLAY)
}

/// Global overlay, then the process environment.
pub fn default_lookup() -> Arc<dyn KeyValueSource> {
    Arc::new(
        Layered::new()
            .with(global_overlay())
            .with(Arc::new(ProcessEnv)),
    )
}
