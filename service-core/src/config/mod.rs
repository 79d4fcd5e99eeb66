use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listens_on_5000_by_default() {
        assert_eq!(Config::default().port, 5000);
    }

    #[test]
    fn missing_port_falls_back_to_default() {
        let config: Config = Cfg::builder()
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn explicit_port_overrides_default() {
        let config: Config = Cfg::builder()
            .set_override("port", 8081)
            .unwrap()
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();
        assert_eq!(config.port, 8081);
    }
}
