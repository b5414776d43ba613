//! Settings-backed collaborators for the terminal front end.

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use client_core::session::{AuthProvider, SessionInfo, Theme, ThemeProvider, AFTER_SIGN_OUT_URL};
use tracing::warn;

/// Signed in exactly when an api key is configured; sign-in and sign-up are
/// managed by editing the settings, not through this process.
pub struct SettingsAuth {
    session: Option<SessionInfo>,
}

impl SettingsAuth {
    pub fn new(api_key: Option<&str>, account_name: Option<&str>) -> Self {
        let session = api_key.map(|_| SessionInfo {
            display_name: account_name.unwrap_or("workspace user").to_string(),
        });
        Self { session }
    }
}

#[async_trait]
impl AuthProvider for SettingsAuth {
    fn session(&self) -> Option<SessionInfo> {
        self.session.clone()
    }

    async fn sign_in(&self) -> Result<()> {
        Err(anyhow!("sign-in is configured through tasks.toml (set api_key)"))
    }

    async fn sign_up(&self) -> Result<()> {
        Err(anyhow!("sign-up is configured through tasks.toml (set api_key)"))
    }

    async fn sign_out(&self) -> Result<String> {
        Ok(AFTER_SIGN_OUT_URL.to_string())
    }
}

/// Theme persisted in a TOML sidecar file.
pub struct FileTheme {
    path: PathBuf,
    dark: AtomicBool,
}

impl FileTheme {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let dark = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| toml::from_str::<HashMap<String, String>>(&raw).ok())
            .and_then(|cfg| cfg.get("theme").cloned())
            .map(|theme| theme == "dark")
            .unwrap_or(false);
        Self {
            path,
            dark: AtomicBool::new(dark),
        }
    }
}

impl ThemeProvider for FileTheme {
    fn current(&self) -> Theme {
        if self.dark.load(Ordering::Relaxed) {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn toggle(&self) -> Theme {
        let next = self.current().flipped();
        self.dark.store(next == Theme::Dark, Ordering::Relaxed);
        let raw = match next {
            Theme::Dark => "theme = \"dark\"\n",
            Theme::Light => "theme = \"light\"\n",
        };
        if let Err(err) = fs::write(&self.path, raw) {
            warn!("failed to persist theme to {}: {err}", self.path.display());
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_survives_reopening_the_sidecar_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("theme.toml");

        let theme = FileTheme::open(&path);
        assert_eq!(theme.current(), Theme::Light);
        assert_eq!(theme.toggle(), Theme::Dark);

        let reopened = FileTheme::open(&path);
        assert_eq!(reopened.current(), Theme::Dark);
    }

    #[test]
    fn api_key_presence_decides_the_session() {
        let signed_out = SettingsAuth::new(None, None);
        assert_eq!(signed_out.session(), None);

        let signed_in = SettingsAuth::new(Some("anon-key"), Some("ada"));
        assert_eq!(
            signed_in.session().map(|s| s.display_name),
            Some("ada".to_string())
        );

        let anonymous = SettingsAuth::new(Some("anon-key"), None);
        assert_eq!(
            anonymous.session().map(|s| s.display_name),
            Some("workspace user".to_string())
        );
    }
}
