use dragon_conf::{Config, Constants};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AppConfig {
    app: AppSection,
    database: DatabaseSection,
}

#[derive(Debug, Deserialize)]
struct AppSection {
    name: String,
    debug: bool,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct DatabaseSection {
    host: String,
    port: u16,
    url: String,
}

const DEFAULTS: &str = r#"
[app]
name = "demo ${APP_VERSION}"
debug = false

[database]
host = "localhost"
port = 5432
url = "postgres://localhost:5432/${DB_NAME}"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut constants = Constants::new();
    constants.define("APP_VERSION", env!("CARGO_PKG_VERSION"));
    constants.define("DB_NAME", "demo");

    let defaults: toml::Table = toml::from_str(DEFAULTS)?;
    let mut config = Config::builder()
        .with_toml(defaults)
        .with_registry(constants)
        .build();

    config.set("app.debug", true);
    println!("debug enabled: {}", config.has("app.debug"));
    println!("database url: {:?}", config.get("database.url"));
    println!("missing key: {:?}", config.get_or("cache.ttl", 300));

    let typed: AppConfig = config.deserialize()?;
    println!("App: {} (debug={})", typed.app.name, typed.app.debug);
    println!("Database URL: {}", typed.database.url);

    Ok(())
}
