//! Named constants consulted during placeholder substitution.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Read-only lookup of constants by name.
///
/// A [`Config`](super::Config) never writes to its registry. Implementations
/// shared between threads must be safe to read concurrently.
pub trait ConstantRegistry {
    /// Returns the text of the constant `name`, or `None` if it is undefined.
    fn constant(&self, name: &str) -> Option<String>;
}

/// Registry that defines nothing. Every placeholder is left unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConstants;

impl ConstantRegistry for NoConstants {
    fn constant(&self, _name: &str) -> Option<String> {
        None
    }
}

/// An owned table of constants, populated by the host before lookups.
///
/// ```
/// use dragon_conf::{ConstantRegistry, Constants};
///
/// let mut constants = Constants::new();
/// constants.define("APP_VERSION", "2.1.0");
/// constants.define("MAX_WORKERS", 8);
///
/// assert_eq!(constants.constant("MAX_WORKERS").as_deref(), Some("8"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Constants {
    values: HashMap<String, String>,
}

impl Constants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines `name`, storing the display form of `value`.
    ///
    /// Returns the previous text if the name was already defined.
    pub fn define(&mut self, name: impl Into<String>, value: impl fmt::Display) -> Option<String> {
        self.values.insert(name.into(), value.to_string())
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConstantRegistry for Constants {
    fn constant(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for Constants
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut constants = Constants::new();
        for (name, value) in iter {
            constants.define(name, value);
        }
        constants
    }
}

/// Constants read from the process environment.
///
/// The placeholder `${NAME}` resolves to the variable `<prefix>NAME`. An
/// unset variable, or one that is not valid unicode, is undefined.
#[derive(Debug, Clone, Default)]
pub struct EnvConstants {
    prefix: String,
}

impl EnvConstants {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ConstantRegistry for EnvConstants {
    fn constant(&self, name: &str) -> Option<String> {
        std::env::var(format!("{}{}", self.prefix, name)).ok()
    }
}

impl ConstantRegistry for HashMap<String, String> {
    fn constant(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl ConstantRegistry for BTreeMap<String, String> {
    fn constant(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Looks in the first registry, then the second.
impl<A, B> ConstantRegistry for (A, B)
where
    A: ConstantRegistry,
    B: ConstantRegistry,
{
    fn constant(&self, name: &str) -> Option<String> {
        self.0.constant(name).or_else(|| self.1.constant(name))
    }
}

impl<T: ConstantRegistry + ?Sized> ConstantRegistry for &T {
    fn constant(&self, name: &str) -> Option<String> {
        (**self).constant(name)
    }
}

impl<T: ConstantRegistry + ?Sized> ConstantRegistry for Box<T> {
    fn constant(&self, name: &str) -> Option<String> {
        (**self).constant(name)
    }
}

impl<T: ConstantRegistry + ?Sized> ConstantRegistry for Arc<T> {
    fn constant(&self, name: &str) -> Option<String> {
        (**self).constant(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_define_and_redefine() {
        let mut constants = Constants::new();
        assert!(constants.is_empty());
        assert_eq!(constants.define("LEVEL", 1), None);
        assert_eq!(constants.define("LEVEL", 2), Some("1".to_string()));
        assert_eq!(constants.constant("LEVEL").as_deref(), Some("2"));
        assert!(constants.is_defined("LEVEL"));
        assert_eq!(constants.len(), 1);
    }

    #[test]
    fn test_constants_from_iter() {
        let constants: Constants = [("A", "x"), ("B", "y")].into_iter().collect();
        assert_eq!(constants.constant("A").as_deref(), Some("x"));
        assert_eq!(constants.constant("C"), None);
    }

    #[test]
    fn test_no_constants() {
        assert_eq!(NoConstants.constant("ANY"), None);
    }

    #[test]
    fn test_env_constants_use_prefix() {
        // Unique names so parallel tests do not collide.
        std::env::set_var("DRAGON_CONF_TEST_HOME_DIR", "/srv/app");
        let env = EnvConstants::new("DRAGON_CONF_TEST_");

        assert_eq!(env.constant("HOME_DIR").as_deref(), Some("/srv/app"));
        assert_eq!(env.constant("UNSET_FOR_SURE"), None);
    }

    #[test]
    fn test_pair_prefers_first() {
        let first: Constants = [("NAME", "first")].into_iter().collect();
        let mut second = HashMap::new();
        second.insert("NAME".to_string(), "second".to_string());
        second.insert("ONLY".to_string(), "second-only".to_string());

        let chained = (first, second);
        assert_eq!(chained.constant("NAME").as_deref(), Some("first"));
        assert_eq!(chained.constant("ONLY").as_deref(), Some("second-only"));
        assert_eq!(chained.constant("NONE"), None);
    }

    #[test]
    fn test_shared_registry_through_arc() {
        let shared: Arc<dyn ConstantRegistry + Send + Sync> =
            Arc::new([("K", "v")].into_iter().collect::<Constants>());
        assert_eq!(shared.constant("K").as_deref(), Some("v"));
    }
}
