use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::builder::ConfigBuilder;
use super::merge::merge_tables;
use super::path::{assign, lookup};
use super::registry::{ConstantRegistry, NoConstants};
use super::resolve::{resolve_tree, resolve_value};
use super::value::{from_toml_table, table_to_toml, Table, Value};
use super::ConfigError;

pub(crate) type SharedRegistry = Arc<dyn ConstantRegistry + Send + Sync>;

/// A tree of named values addressed by dot-separated paths.
///
/// Each level of the path selects a key in a nested table, so `"db.host"`
/// reads key `host` of the table stored under `db`. String values may hold
/// `${NAME}` placeholders that [`get`](Self::get) fills in from the
/// container's [`ConstantRegistry`].
///
/// The container owns its tree outright. Cloning copies the tree and shares
/// only the read-only registry.
///
/// ## Example
///
/// ```
/// use dragon_conf::{Config, Constants, Value};
///
/// let mut constants = Constants::new();
/// constants.define("DATA_DIR", "/var/lib/app");
///
/// let mut config = Config::new().with_registry(constants);
/// config.set("storage.path", "${DATA_DIR}/blobs");
/// config.set("storage.shards", 4);
///
/// assert_eq!(config.get("storage.path").unwrap().as_str(), Some("/var/lib/app/blobs"));
/// assert_eq!(config.get_or("storage.replicas", 1).as_integer(), Some(1));
/// assert!(config.has("storage"));
/// ```
#[derive(Clone)]
pub struct Config {
    values: Table,
    registry: SharedRegistry,
}

impl Config {
    /// Creates an empty container with no constants defined.
    pub fn new() -> Self {
        Self::from_parts(Table::new(), Arc::new(NoConstants))
    }

    /// Creates a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub(crate) fn from_parts(values: Table, registry: SharedRegistry) -> Self {
        Self { values, registry }
    }

    /// Replaces the registry consulted for placeholder substitution.
    pub fn with_registry<R>(mut self, registry: R) -> Self
    where
        R: ConstantRegistry + Send + Sync + 'static,
    {
        self.registry = Arc::new(registry);
        self
    }

    /// Returns `true` if `path` leads to a value other than `Null`.
    ///
    /// A path explicitly set to `Null` reports `false`, the same as a path
    /// that was never set.
    pub fn has(&self, path: &str) -> bool {
        lookup(&self.values, path).is_some_and(|value| !value.is_null())
    }

    /// Gets the value at `path`, or `None` if the path is absent or `Null`.
    ///
    /// A string value has its placeholders substituted; the result borrows
    /// from the tree unless a substitution happened. Tables and arrays are
    /// returned untouched, strings inside them included.
    pub fn get(&self, path: &str) -> Option<Cow<'_, Value>> {
        let value = lookup(&self.values, path).filter(|value| !value.is_null())?;
        Some(resolve_value(value, &*self.registry))
    }

    /// Gets the value at `path`, falling back to `default`.
    ///
    /// The default is returned as given; placeholders in it are not
    /// substituted.
    pub fn get_or(&self, path: &str, default: impl Into<Value>) -> Cow<'_, Value> {
        self.get(path).unwrap_or_else(|| Cow::Owned(default.into()))
    }

    /// Stores `value` at `path`.
    ///
    /// Missing intermediate tables are created. An intermediate value that is
    /// not a table is discarded and replaced by one.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        assign(&mut self.values, path, value.into());
    }

    /// Merges a snapshot of `other` into this container.
    ///
    /// Keys present on only one side are adopted. When both sides hold a
    /// table under the same key the tables merge recursively; any other
    /// collision keeps both values as an array, this container's first.
    /// `other` is left unchanged and its registry is not adopted.
    pub fn merge(&mut self, other: &Config) -> &mut Self {
        self.merge_table(other.values.clone())
    }

    /// Merges a bare tree into this container, as [`merge`](Self::merge) does.
    pub fn merge_table(&mut self, other: Table) -> &mut Self {
        trace!(keys = other.len(), "merging configuration tree");
        merge_tables(&mut self.values, other);
        self
    }

    /// Returns an owned copy of the whole tree, without substitution.
    pub fn to_table(&self) -> Table {
        self.values.clone()
    }

    /// Consumes the container and returns its tree.
    pub fn into_table(self) -> Table {
        self.values
    }

    /// Deserializes the whole tree into a typed structure.
    ///
    /// Every string leaf, including those nested in tables and arrays, has
    /// its placeholders substituted first. `Null` table entries are treated
    /// as missing fields.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        debug!(target_type = std::any::type_name::<T>(), "deserializing configuration");
        let resolved = resolve_tree(&self.values, &*self.registry);
        let value = toml::Value::Table(table_to_toml(&resolved, "")?);
        value.try_into().map_err(ConfigError::DeserializeError)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

impl From<Table> for Config {
    fn from(values: Table) -> Self {
        Self::from_parts(values, Arc::new(NoConstants))
    }
}

impl From<toml::Table> for Config {
    fn from(table: toml::Table) -> Self {
        Self::from(from_toml_table(table))
    }
}
