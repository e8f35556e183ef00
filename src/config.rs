use crate::chat::{ChatSettings, Credential, DEFAULT_API_KEY_VAR};
use std::{env, net::SocketAddr, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub chat: ChatSettings,
}

impl Config {
    /// Builds the configuration from `PORT`, `APP_DATA_DIR` and the `CHAT_*`
    /// variables. Anything unset or unparsable keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_dir = lookup("APP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let mut chat = ChatSettings::default();
        if let Some(endpoint) = lookup("CHAT_ENDPOINT") {
            chat.endpoint = endpoint;
        }
        if let Some(model) = lookup("CHAT_MODEL") {
            chat.model = model;
        }
        if let Some(referer) = lookup("CHAT_REFERER") {
            chat.referer = referer;
        }
        chat.credential = Credential::Env(
            lookup("CHAT_API_KEY_VAR").unwrap_or_else(|| DEFAULT_API_KEY_VAR.to_string()),
        );

        Self { port, data_dir, chat }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.chat.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.chat.model, DEFAULT_MODEL);
        assert!(matches!(&config.chat.credential, Credential::Env(var) if var == DEFAULT_API_KEY_VAR));
    }

    #[test]
    fn bad_port_falls_back() {
        assert_eq!(config(&[("PORT", "eighty")]).port, 8080);
        assert_eq!(config(&[("PORT", "3000")]).addr().port(), 3000);
    }

    #[test]
    fn chat_overrides_apply() {
        let config = config(&[
            ("CHAT_ENDPOINT", "http://127.0.0.1:9/v1/chat/completions"),
            ("CHAT_MODEL", "local/test"),
            ("CHAT_API_KEY_VAR", "MY_KEY"),
            ("APP_DATA_DIR", "/tmp/emoweb"),
        ]);
        assert_eq!(config.chat.endpoint, "http://127.0.0.1:9/v1/chat/completions");
        assert_eq!(config.chat.model, "local/test");
        assert!(matches!(&config.chat.credential, Credential::Env(var) if var == "MY_KEY"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/emoweb"));
    }
}
