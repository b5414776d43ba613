//! Session and theme header: pure delegation over collaborator traits.
//! The header owns no state and issues no requests of its own.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

/// Where the account control navigates after signing out.
pub const AFTER_SIGN_OUT_URL: &str = "/";

const DEFAULT_BRAND: &str = "MyApp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub display_name: String,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn session(&self) -> Option<SessionInfo>;
    async fn sign_in(&self) -> Result<()>;
    async fn sign_up(&self) -> Result<()>;
    /// Signs out and returns the redirect target to navigate to afterwards.
    async fn sign_out(&self) -> Result<String>;
}

pub struct MissingAuthProvider;

#[async_trait]
impl AuthProvider for MissingAuthProvider {
    fn session(&self) -> Option<SessionInfo> {
        None
    }

    async fn sign_in(&self) -> Result<()> {
        Err(anyhow!("auth provider is unavailable"))
    }

    async fn sign_up(&self) -> Result<()> {
        Err(anyhow!("auth provider is unavailable"))
    }

    async fn sign_out(&self) -> Result<String> {
        Err(anyhow!("auth provider is unavailable"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub trait ThemeProvider: Send + Sync {
    fn current(&self) -> Theme;
    /// Flips the theme, persists it, and returns the new value.
    /// Persistence is the provider's responsibility.
    fn toggle(&self) -> Theme;
}

pub struct MissingThemeProvider;

impl ThemeProvider for MissingThemeProvider {
    fn current(&self) -> Theme {
        Theme::Light
    }

    fn toggle(&self) -> Theme {
        Theme::Light
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderControl {
    SignIn,
    SignUp,
    AccountMenu { after_sign_out_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub brand: String,
    pub theme: Theme,
    pub controls: Vec<HeaderControl>,
    pub session: Option<SessionInfo>,
}

pub struct HeaderState {
    brand: String,
}

impl Default for HeaderState {
    fn default() -> Self {
        Self {
            brand: DEFAULT_BRAND.to_string(),
        }
    }
}

impl HeaderState {
    pub fn new(brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
        }
    }

    /// Computes the header controls from collaborator state: signed-out
    /// shows sign-in/sign-up, signed-in shows the account menu. The theme
    /// toggle is always present alongside these controls.
    pub fn view(&self, auth: &dyn AuthProvider, theme: &dyn ThemeProvider) -> HeaderView {
        let session = auth.session();
        let controls = match &session {
            Some(_) => vec![HeaderControl::AccountMenu {
                after_sign_out_url: AFTER_SIGN_OUT_URL.to_string(),
            }],
            None => vec![HeaderControl::SignIn, HeaderControl::SignUp],
        };
        HeaderView {
            brand: self.brand.clone(),
            theme: theme.current(),
            controls,
            session,
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
