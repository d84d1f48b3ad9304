//! Hierarchical configuration container.

mod builder;
mod container;
mod error;
mod merge;
mod path;
mod registry;
mod resolve;
mod value;

pub use builder::ConfigBuilder;
pub use container::Config;
pub use error::ConfigError;
pub use registry::{ConstantRegistry, Constants, EnvConstants, NoConstants};
pub use value::{from_toml_table, Table, Value};
