use anyhow::{Result, anyhow};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    pub graphiql_enabled: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        let graphiql_enabled = match lookup("GRAPHIQL_ENABLED") {
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| anyhow!("GRAPHIQL_ENABLED must be a boolean, got `{raw}`"))?,
            None => true,
        };

        Ok(Self {
            cors_allowed_origins,
            graphiql_enabled,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: Vec::new(),
            graphiql_enabled: true,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_allow_any_origin_and_graphiql() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CORS_ALLOWED_ORIGINS", " http://localhost:5173, ,https://crm.example.com "),
            ("GRAPHIQL_ENABLED", "off"),
        ]))
        .unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:5173", "https://crm.example.com"]
        );
        assert!(!config.graphiql_enabled);
    }

    #[test]
    fn bad_flag_is_an_error() {
        assert!(AppConfig::from_lookup(lookup(&[("GRAPHIQL_ENABLED", "maybe")])).is_err());
    }
}
