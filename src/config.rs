use std::env;

use tokio::{fs::File, io::AsyncReadExt};

use serde::Deserialize;
use tracing::{error, warn};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(rename = "databaseUrl", default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_playground")]
    pub playground: bool,
}

fn default_database_url() -> String {
    String::from("sqlite://local.db?mode=rwc")
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

fn default_port() -> u16 {
    4000
}

fn default_playground() -> bool {
    true
}

impl Config {
    /// `DB_URL` and `PORT` take precedence over the file
    pub fn with_env<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("DB_URL") {
            self.database_url = url;
        }
        if let Some(port) = var("PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(e) => warn!("Ignoring invalid PORT {port:?}: {e}"),
            }
        }
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// reads config file, `$CONFIG` or `config.yaml`
pub async fn get() -> Result<Config, ()> {
    let path = env::var("CONFIG").unwrap_or_else(|_| String::from("config.yaml"));
    let config = read(&path).await?;
    Ok(config.with_env(|name| env::var(name).ok()))
}

async fn read(path: &str) -> Result<Config, ()> {
    let mut file = File::open(path).await.map_err(|e| error!("Error opening file {path}: {e}"))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).await.map_err(|e| error!("Error reading file {path}: {e}"))?;
    serde_yaml::from_str(&contents).map_err(|e| error!("Error decoding file {path}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[tokio::test]
    async fn read() {
        tracing_subscriber::fmt::try_init().ok();
        super::read("config.yaml").await.unwrap();
    }

    #[test]
    fn defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.database_url, "sqlite://local.db?mode=rwc");
        assert_eq!(config.address(), "0.0.0.0:4000");
        assert!(config.playground);
    }

    #[test]
    fn decode() {
        let config: Config =
            serde_yaml::from_str("databaseUrl: sqlite://quakes.db\nhost: 127.0.0.1\nport: 8080\nplayground: false\n")
                .unwrap();
        assert_eq!(config.database_url, "sqlite://quakes.db");
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert!(!config.playground);
    }

    #[test]
    fn env_overrides() {
        let config: Config = serde_yaml::from_str("port: 8080").unwrap();

        let overridden = config.clone().with_env(|name| match name {
            "DB_URL" => Some(String::from("sqlite::memory:")),
            "PORT" => Some(String::from("9000")),
            _ => None,
        });
        assert_eq!(overridden.database_url, "sqlite::memory:");
        assert_eq!(overridden.port, 9000);

        let invalid = config.clone().with_env(|name| (name == "PORT").then(|| String::from("not a port")));
        assert_eq!(invalid, config);
    }
}
