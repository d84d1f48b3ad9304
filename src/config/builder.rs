use std::sync::Arc;

use super::container::{Config, SharedRegistry};
use super::merge::merge_tables;
use super::path::assign;
use super::registry::{ConstantRegistry, Constants, NoConstants};
use super::value::{Table, Value};

/// A step in building the initial tree.
#[derive(Debug)]
enum ValueSource {
    Tree(Table),
    Entry { path: String, value: Value },
}

/// Builder for a [`Config`] with its initial values and constants.
///
/// Sources are applied in registration order. Trees are merge-combined into
/// what came before (see [`Config::merge`]); single entries are written with
/// [`Config::set`] semantics and replace whatever was at their path.
///
/// ## Example
///
/// ```
/// use dragon_conf::Config;
///
/// let defaults: toml::Table = toml::from_str(r#"
///     [log]
///     dir = "${STATE_DIR}/log"
/// "#).unwrap();
///
/// let config = Config::builder()
///     .with_toml(defaults)
///     .with_value("log.level", "info")
///     .with_constant("STATE_DIR", "/var/state")
///     .build();
///
/// assert_eq!(config.get("log.dir").unwrap().as_str(), Some("/var/state/log"));
/// assert_eq!(config.get("log.level").unwrap().as_str(), Some("info"));
/// ```
#[derive(Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ConfigBuilder {
    sources: Vec<ValueSource>,
    constants: Constants,
    registry: Option<SharedRegistry>,
}

impl ConfigBuilder {
    /// Adds a tree to merge into the initial values.
    pub fn with_values(mut self, values: Table) -> Self {
        self.sources.push(ValueSource::Tree(values));
        self
    }

    /// Adds a parsed TOML table to merge into the initial values.
    pub fn with_toml(self, table: toml::Table) -> Self {
        self.with_values(super::value::from_toml_table(table))
    }

    /// Sets a single value at a dotted path.
    pub fn with_value(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sources.push(ValueSource::Entry {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    /// Uses `registry` for placeholder substitution.
    ///
    /// Constants added with [`with_constant`](Self::with_constant) are looked
    /// up first and shadow the registry.
    pub fn with_registry<R>(mut self, registry: R) -> Self
    where
        R: ConstantRegistry + Send + Sync + 'static,
    {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Defines a constant local to the built container.
    pub fn with_constant(mut self, name: impl Into<String>, value: impl std::fmt::Display) -> Self {
        self.constants.define(name, value);
        self
    }

    /// Builds the container. Building never fails.
    pub fn build(self) -> Config {
        let mut values = Table::new();
        for source in self.sources {
            match source {
                ValueSource::Tree(tree) => merge_tables(&mut values, tree),
                ValueSource::Entry { path, value } => assign(&mut values, &path, value),
            }
        }

        let registry: SharedRegistry = match (self.registry, self.constants.is_empty()) {
            (None, true) => Arc::new(NoConstants),
            (None, false) => Arc::new(self.constants),
            (Some(registry), true) => registry,
            (Some(registry), false) => Arc::new((self.constants, registry)),
        };

        Config::from_parts(values, registry)
    }
}

impl std::fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("sources", &self.sources)
            .field("constants", &self.constants)
            .field("has_registry", &self.registry.is_some())
            .finish()
    }
}
