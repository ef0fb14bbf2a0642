
use dashmap::DashMap;
use log::{debug, trace};

use crate::error::{RegistryError, RegistryResult};
use crate::interfaces::container::{Container, Entry};

/// Name-keyed container backed by a concurrent map.
///
/// Every read and write goes through the map's own shard locks, so a
/// `BasicContainer` can be shared between threads as-is.
pub struct BasicContainer {
    instances: DashMap<String, Entry>,
}

impl BasicContainer {
    pub fn new() -> Self {
        BasicContainer {
            instances: DashMap::new(),
        }
    }
}

impl Container for BasicContainer {
    fn register(&self, name: String, value: Entry) {
        trace!("registering service '{}'", name);
        if self.instances.insert(name.clone(), value).is_some() {
            debug!("service '{}' replaced an earlier registration", name);
        }
    }

    fn resolve(&self, name: &str) -> RegistryResult<Entry> {
        trace!("resolving service '{}'", name);
        self.instances
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    fn len(&self) -> usize {
        self.instances.len()
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .instances
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }
}

impl Default for BasicContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BasicContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicContainer")
            .field("names", &self.names())
            .finish()
    }
}
