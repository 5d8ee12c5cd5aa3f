use std::fmt;

use crate::error::{ReelError, ReelResult};

pub const DEFAULT_GRAPH_ROOT: &str = "https://graph.facebook.com/v19.0";
pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TRENDS_GEO: &str = "IN";

/// Settings for one job, read once at startup and handed to every stage.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub ig_user_id: String,
    pub ig_token: String,
    pub graph_root: String,
    pub openai_base: String,
    pub trends_geo: String,
}

impl Config {
    /// Loads `.env` (if any) and then reads the process environment.
    pub fn from_env() -> ReelResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ReelResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ReelError::Config(key.to_string()))
        };
        let optional = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let openai_api_key = required("OPENAI_API_KEY")?;
        let ig_user_id = required("IG_USER_ID")?;
        let ig_token = required("IG_TOKEN")?;

        if !ig_user_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReelError::InvalidConfig {
                name: "IG_USER_ID".to_string(),
                reason: format!("expected a numeric id, got {:?}", ig_user_id),
            });
        }

        Ok(Self {
            openai_api_key,
            ig_user_id,
            ig_token,
            graph_root: optional("GRAPH_API_ROOT", DEFAULT_GRAPH_ROOT)
                .trim_end_matches('/')
                .to_string(),
            openai_base: optional("OPENAI_API_BASE", DEFAULT_OPENAI_BASE)
                .trim_end_matches('/')
                .to_string(),
            trends_geo: optional("TRENDS_GEO", DEFAULT_TRENDS_GEO),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"<redacted>")
            .field("ig_user_id", &self.ig_user_id)
            .field("ig_token", &"<redacted>")
            .field("graph_root", &self.graph_root)
            .field("openai_base", &self.openai_base)
            .field("trends_geo", &self.trends_geo)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("OPENAI_API_KEY", "sk-test"),
        ("IG_USER_ID", "17841400000000000"),
        ("IG_TOKEN", "EAAG-token"),
    ];

    #[test]
    fn loads_required_values_and_defaults() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.ig_user_id, "17841400000000000");
        assert_eq!(config.ig_token, "EAAG-token");
        assert_eq!(config.graph_root, DEFAULT_GRAPH_ROOT);
        assert_eq!(config.openai_base, DEFAULT_OPENAI_BASE);
        assert_eq!(config.trends_geo, DEFAULT_TRENDS_GEO);
    }

    #[test]
    fn each_missing_variable_is_reported_by_name() {
        for missing in ["OPENAI_API_KEY", "IG_USER_ID", "IG_TOKEN"] {
            let pairs: Vec<_> = REQUIRED
                .iter()
                .copied()
                .filter(|(k, _)| *k != missing)
                .collect();
            match Config::from_lookup(lookup_from(&pairs)) {
                Err(ReelError::Config(name)) => assert_eq!(name, missing),
                other => panic!("expected config error for {missing}, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[2] = ("IG_TOKEN", "   ");
        assert!(matches!(
            Config::from_lookup(lookup_from(&pairs)),
            Err(ReelError::Config(name)) if name == "IG_TOKEN"
        ));
    }

    #[test]
    fn non_numeric_user_id_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("IG_USER_ID", "my-account");
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ReelError::InvalidConfig { ref name, .. } if name == "IG_USER_ID"));
        assert_eq!(
            err.to_string(),
            "Invalid env-var IG_USER_ID: expected a numeric id, got \"my-account\""
        );
    }

    #[test]
    fn overrides_strip_trailing_slash() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("GRAPH_API_ROOT", "http://127.0.0.1:9000/v19.0/"));
        pairs.push(("OPENAI_API_BASE", "http://127.0.0.1:9001/v1/"));
        pairs.push(("TRENDS_GEO", "US"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.graph_root, "http://127.0.0.1:9000/v19.0");
        assert_eq!(config.openai_base, "http://127.0.0.1:9001/v1");
        assert_eq!(config.trends_geo, "US");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-test"));
        assert!(!printed.contains("EAAG-token"));
        assert!(printed.contains("17841400000000000"));
    }
}
