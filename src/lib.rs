pub mod config;

pub use config::{
    from_toml_table, Config, ConfigBuilder, ConfigError, ConstantRegistry, Constants,
    EnvConstants, NoConstants, Table, Value,
};
