use serde::Deserialize;
use url::Url;

/// Environment variable naming the upstream spreadsheet-script URL.
pub const UPSTREAM_URL_VAR: &str = "SHEET_API_URL";
/// Environment variable naming the shared secret injected into every
/// forwarded request.
pub const SHARED_SECRET_VAR: &str = "SHEET_API_TOKEN";

#[derive(Deserialize, Debug)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 8787,
        }
    }
}

/// Relay configuration.
///
/// The upstream URL and shared secret are deliberately optional: the relay
/// starts without them and answers every request with a structured 500
/// naming the missing value. Environment variables override the file.
#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    pub upstream_url: Option<Url>,
    pub shared_secret: Option<String>,
}

impl Config {
    /// Applies environment overrides on top of the file-provided values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(UPSTREAM_URL_VAR) {
            match Url::parse(&raw) {
                Ok(url) => self.upstream_url = Some(url),
                Err(err) => {
                    tracing::warn!(var = UPSTREAM_URL_VAR, error = %err, "ignoring unparseable upstream URL");
                }
            }
        }
        if let Ok(token) = std::env::var(SHARED_SECRET_VAR) {
            self.shared_secret = Some(token);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_defaults_apply() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.listener.host, "127.0.0.1");
        assert_eq!(config.listener.port, 8787);
        assert!(config.upstream_url.is_none());
        assert!(config.shared_secret.is_none());
    }

    #[test]
    fn full_config_parses() {
        let yaml = r#"
            listener:
                host: 0.0.0.0
                port: 9000
            upstream_url: "https://script.example.com/exec"
            shared_secret: "s3cret"
        "#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.listener.port, 9000);
        assert_eq!(
            config.upstream_url.unwrap().as_str(),
            "https://script.example.com/exec"
        );
        assert_eq!(config.shared_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn invalid_upstream_url_is_rejected_at_parse() {
        let yaml = r#"upstream_url: "not a url""#;
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }
}
