use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Config {
    pub application: ApplicationConfig,
    #[serde(default)]
    pub referral: ReferralConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationConfig {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub debug_mode: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            debug_mode: "referral_server=debug,tower_http=debug".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ReferralConfig {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub bonus: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_code_attempts: u32,
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            bonus: 10,
            max_code_attempts: 16,
        }
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

/// Reads `configuration/base.yaml`, then `configuration/{APP_ENVIRONMENT}.yaml`,
/// then `APP_`-prefixed environment variables (`__` between nested keys).
pub fn get_config() -> Result<Config, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(e.to_string()))?;
    let config_dir = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_file = format!("{}.yaml", environment.as_str());

    config::Config::builder()
        .add_source(config::File::from(config_dir.join("base.yaml")))
        .add_source(config::File::from(config_dir.join(environment_file)).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize::<Config>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.application.port, 5000);
        assert_eq!(config.referral.bonus, 10);
        assert_eq!(config.referral.max_code_attempts, 16);
    }

    #[test]
    fn environment_names() {
        assert!(matches!(
            Environment::try_from("LOCAL".to_string()),
            Ok(Environment::Local)
        ));
        assert!(matches!(
            Environment::try_from("production".to_string()),
            Ok(Environment::Production)
        ));
        assert!(Environment::try_from("staging".to_string()).is_err());
    }

    #[test]
    fn numbers_may_arrive_as_strings() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "application": { "host": "0.0.0.0", "port": "8080", "debug_mode": "info" },
            "referral": { "bonus": "25", "max_code_attempts": 4 },
        }))
        .unwrap();
        assert_eq!(config.application.port, 8080);
        assert_eq!(config.referral.bonus, 25);
        assert_eq!(config.referral.max_code_attempts, 4);
    }

    #[test]
    fn negative_bonus_is_rejected() {
        let result: Result<Config, _> = serde_json::from_value(serde_json::json!({
            "application": { "host": "0.0.0.0", "port": 5000, "debug_mode": "info" },
            "referral": { "bonus": -10, "max_code_attempts": 4 },
        }));
        assert!(result.is_err());
    }

    #[test]
    fn referral_section_is_optional() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "application": { "host": "0.0.0.0", "port": 5000, "debug_mode": "info" },
        }))
        .unwrap();
        assert_eq!(config.referral.bonus, 10);
    }
}
