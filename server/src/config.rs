use anyhow::{Result, anyhow};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
    pub graphiql: bool,
    pub pretty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: Vec::new(),
            graphiql: true,
            pretty: true,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

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

        let graphiql = env_bool(&lookup, "GRAPHIQL_ENABLED", defaults.graphiql)?;
        let pretty = env_bool(&lookup, "PRETTY_RESPONSES", defaults.pretty)?;

        Ok(Self {
            cors_allowed_origins,
            graphiql,
            pretty,
        })
    }
}

fn env_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        "" => Ok(default),
        other => Err(anyhow!("invalid boolean for {key}: {other:?}")),
    }
}
