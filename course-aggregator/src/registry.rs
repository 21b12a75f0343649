use crate::traits::SourceAdapter;
use crate::types::{AggregatorError, CourseKey, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A registered source: the fetch capability and the course page it links to.
#[derive(Clone)]
pub struct Registration {
    pub adapter: Arc<dyn SourceAdapter>,
    pub url: String,
}

/// Maps course keys to the adapter that scrapes them.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<CourseKey, Registration>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        key: impl Into<CourseKey>,
        url: impl Into<String>,
        adapter: Arc<dyn SourceAdapter>,
    ) {
        let key = key.into();
        let url = url.into();
        info!("Registering {} for {} ({})", adapter.source_name(), key, url);
        if self.adapters.insert(key.clone(), Registration { adapter, url }).is_some() {
            debug!("Replaced existing adapter for {}", key);
        }
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(
        mut self,
        key: impl Into<CourseKey>,
        url: impl Into<String>,
        adapter: Arc<dyn SourceAdapter>,
    ) -> Self {
        self.register(key, url, adapter);
        self
    }

    pub fn get(&self, key: &CourseKey) -> Result<&Registration> {
        self.adapters
            .get(key)
            .ok_or_else(|| AggregatorError::UnregisteredKey(key.clone()))
    }

    pub fn contains(&self, key: &CourseKey) -> bool {
        self.adapters.contains_key(key)
    }

    /// Registered keys in presentation order.
    pub fn keys(&self) -> Vec<CourseKey> {
        let mut keys: Vec<CourseKey> = self.adapters.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
