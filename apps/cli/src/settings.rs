use std::{collections::HashMap, fs};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub table: String,
    pub api_key: Option<String>,
    pub account_name: Option<String>,
    pub theme_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:54321/rest/v1".into(),
            table: "tasks".into(),
            api_key: None,
            account_name: None,
            theme_file: "./theme.toml".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("tasks.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
            if let Some(v) = file_cfg.get("table") {
                settings.table = v.clone();
            }
            if let Some(v) = file_cfg.get("api_key") {
                settings.api_key = Some(v.clone());
            }
            if let Some(v) = file_cfg.get("account_name") {
                settings.account_name = Some(v.clone());
            }
            if let Some(v) = file_cfg.get("theme_file") {
                settings.theme_file = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("TASKS_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Ok(v) = std::env::var("TASKS_API_KEY") {
        settings.api_key = Some(v);
    }
    if let Ok(v) = std::env::var("APP__API_KEY") {
        settings.api_key = Some(v);
    }

    if let Ok(v) = std::env::var("APP__TABLE") {
        settings.table = v;
    }

    if let Ok(v) = std::env::var("APP__ACCOUNT_NAME") {
        settings.account_name = Some(v);
    }

    if let Ok(v) = std::env::var("APP__THEME_FILE") {
        settings.theme_file = v;
    }

    settings
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn defaults_apply_without_configuration() {
        let settings = Settings::default();
        assert_eq!(settings.table, "tasks");
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.theme_file, "./theme.toml");
    }

    #[test]
    fn env_overrides_take_precedence() {
        env::set_var("APP__SERVER_URL", "http://example.test/rest/v1");
        env::set_var("APP__ACCOUNT_NAME", "ada");

        let settings = load_settings();
        assert_eq!(settings.server_url, "http://example.test/rest/v1");
        assert_eq!(settings.account_name.as_deref(), Some("ada"));

        env::remove_var("APP__SERVER_URL");
        env::remove_var("APP__ACCOUNT_NAME");
    }
}
