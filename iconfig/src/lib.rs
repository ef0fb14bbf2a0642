
use serde::{Deserialize, Serialize};
use toml::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use serde::de::DeserializeOwned;
use log::{debug, info};
use iregistry::{Container, ContainerExt};

/// Search path used by [`load`], lowest precedence first.
pub const DEFAULT_PATHS: [&str; 3] = [
    "/etc/iregistry/registry.toml",
    "config/registry.toml",
    "./registry.toml",
];

/// Table whose entries [`ApplicationConfig::seed`] registers.
pub const REGISTRY_TABLE: &str = "registry";

/// Name the config registers itself under in [`ApplicationConfig::install`].
pub const CONFIG_SERVICE: &str = "config";

/// A TOML document that can be layered over other documents and used to
/// seed a container.
///
/// # Examples
///
/// ```
/// use iconfig::ApplicationConfig;
/// use iregistry::{BasicContainer, ContainerExt};
///
/// let mut config = ApplicationConfig::from_str(r#"
///     [registry]
///     service = "billing"
///     [registry.db]
///     pool = 4
/// "#).unwrap();
///
/// // A local override only touches the keys it names.
/// config.merge(ApplicationConfig::from_str("[registry.db]\npool = 16").unwrap());
///
/// let container = BasicContainer::new();
/// assert_eq!(config.seed(&container).unwrap(), 2);
/// assert_eq!(container.resolve_as::<String>("service").unwrap().as_str(), "billing");
/// assert_eq!(*container.resolve_as::<i64>("db.pool").unwrap(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(flatten)]
    value: toml::Table,
}

impl fmt::Display for ApplicationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = toml::to_string(&self.value).map_err(|_| fmt::Error)?;
        write!(f, "{}", rendered)
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self { value: toml::Table::new() }
    }
}

impl ApplicationConfig {
    /// Parse a configuration from a TOML string
    pub fn from_str(s: &str) -> Result<Self, anyhow::Error> {
        let value = toml::from_str(s)?;
        Ok(Self { value })
    }

    /// Read and parse a TOML file
    pub fn from_file<P: AsRef<Path>>(fname: P) -> Result<Self, anyhow::Error> {
        let path = fname.as_ref();
        if !path.exists() {
            return Err(anyhow::anyhow!("File {} does not exist", path.display()));
        }
        let config = std::fs::read_to_string(path)?;
        Self::from_str(&config)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))
    }

    /// Merge another config into this one
    ///
    /// This performs a deep merge where:
    /// - Tables are merged recursively
    /// - Arrays are concatenated
    /// - Other values are overwritten by the new config
    pub fn merge(&mut self, other: Self) {
        merge_tables(&mut self.value, other.value);
    }

    pub fn table(&self) -> &toml::Table {
        &self.value
    }

    /// Get a value by dotted path (e.g., "server.port")
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.value.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Deserialize the table at `prefix` (or the whole document when the
    /// prefix is empty) into `T`.
    pub fn section<T: DeserializeOwned>(&self, prefix: &str) -> Result<T, anyhow::Error> {
        let part = if prefix.is_empty() {
            Value::Table(self.value.clone())
        } else {
            self.get(prefix)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("No config found for {}", prefix))?
        };

        part.try_into()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize {}: {}", prefix, e))
    }

    /// Register every leaf of the `[registry]` table into `container`.
    ///
    /// Nested tables become dotted names. Strings, integers, floats and
    /// booleans are stored as `String`, `i64`, `f64` and `bool`; anything
    /// else is stored as a `toml::Value`. Returns the number of entries
    /// registered. Two keys that flatten to the same name (`"a.b" = 1` next
    /// to `[registry.a] b = 2`) are an error and nothing is registered.
    pub fn seed<C: Container + ?Sized>(&self, container: &C) -> Result<usize, anyhow::Error> {
        let registry = match self.value.get(REGISTRY_TABLE) {
            None => return Ok(0),
            Some(Value::Table(table)) => table,
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "[{}] must be a table, found {}",
                    REGISTRY_TABLE,
                    other.type_str()
                ))
            }
        };

        // Flatten first so a clash leaves the container untouched.
        let mut entries = Vec::new();
        flatten("", registry, &mut HashSet::new(), &mut entries)?;
        for (name, value) in &entries {
            seed_entry(container, name, value);
        }

        let count = entries.len();
        info!("seeded {} services from [{}]", count, REGISTRY_TABLE);
        Ok(count)
    }

    /// Seed `container`, then register the config itself as
    /// `Arc<ApplicationConfig>` under [`CONFIG_SERVICE`].
    pub fn install<C: Container + ?Sized>(self, container: &C) -> Result<Arc<Self>, anyhow::Error> {
        self.seed(container)?;
        let config = Arc::new(self);
        container.provide_shared(CONFIG_SERVICE, Arc::clone(&config));
        Ok(config)
    }
}

fn flatten<'a>(
    prefix: &str,
    table: &'a toml::Table,
    seen: &mut HashSet<String>,
    out: &mut Vec<(String, &'a Value)>,
) -> Result<(), anyhow::Error> {
    for (key, value) in table {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        if let Value::Table(nested) = value {
            flatten(&name, nested, seen, out)?;
            continue;
        }
        if !seen.insert(name.clone()) {
            return Err(anyhow::anyhow!(
                "[{}] defines '{}' more than once",
                REGISTRY_TABLE,
                name
            ));
        }
        out.push((name, value));
    }
    Ok(())
}

fn seed_entry<C: Container + ?Sized>(container: &C, name: &str, value: &Value) {
    match value {
        Value::String(s) => container.provide(name, s.clone()),
        Value::Integer(i) => container.provide(name, *i),
        Value::Float(f) => container.provide(name, *f),
        Value::Boolean(b) => container.provide(name, *b),
        other => container.provide(name, other.clone()),
    }
    debug!("seeded service '{}'", name);
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (k, v) in overlay {
        match base.get_mut(&k) {
            Some(existing) => merge_values(existing, v),
            None => {
                base.insert(k, v);
            }
        }
    }
}

fn merge_values(a: &mut Value, b: Value) {
    match (a, b) {
        // If both are tables, merge them recursively
        (Value::Table(a_map), Value::Table(b_map)) => merge_tables(a_map, b_map),
        // If both are arrays, concatenate them
        (Value::Array(a_vec), Value::Array(b_vec)) => a_vec.extend(b_vec),
        // In all other cases, use the value from b
        (a, b) => *a = b,
    }
}

/// Load and merge every existing file in `paths`, later files overriding
/// earlier ones. Missing files are skipped; it is an error if none exist.
pub fn load_from<P: AsRef<Path>>(paths: &[P]) -> Result<ApplicationConfig, anyhow::Error> {
    let mut config: Option<ApplicationConfig> = None;
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            continue;
        }
        debug!("loading config layer {}", path.display());
        let layer = ApplicationConfig::from_file(path)?;
        match config.as_mut() {
            Some(base) => base.merge(layer),
            None => config = Some(layer),
        }
    }
    config.ok_or_else(|| anyhow::anyhow!("No config file found"))
}

/// Load the layered configuration from [`DEFAULT_PATHS`].
pub fn load() -> Result<ApplicationConfig, anyhow::Error> {
    load_from(&DEFAULT_PATHS)
}
