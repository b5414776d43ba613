use super::*;
use std::sync::atomic::{AtomicBool, Ordering};

struct FakeAuth {
    session: Option<SessionInfo>,
}

#[async_trait::async_trait]
impl AuthProvider for FakeAuth {
    fn session(&self) -> Option<SessionInfo> {
        self.session.clone()
    }

    async fn sign_in(&self) -> Result<()> {
        Ok(())
    }

    async fn sign_up(&self) -> Result<()> {
        Ok(())
    }

    async fn sign_out(&self) -> Result<String> {
        Ok(AFTER_SIGN_OUT_URL.to_string())
    }
}

struct ToggleTheme {
    dark: AtomicBool,
}

impl ThemeProvider for ToggleTheme {
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
        next
    }
}

#[test]
fn signed_out_header_offers_sign_in_and_sign_up() {
    let view = HeaderState::default().view(&MissingAuthProvider, &MissingThemeProvider);

    assert_eq!(view.controls, vec![HeaderControl::SignIn, HeaderControl::SignUp]);
    assert_eq!(view.session, None);
    assert_eq!(view.theme, Theme::Light);
    assert_eq!(view.brand, "MyApp");
}

#[test]
fn signed_in_header_offers_the_account_menu_with_redirect() {
    let auth = FakeAuth {
        session: Some(SessionInfo {
            display_name: "ada".to_string(),
        }),
    };
    let view = HeaderState::new("Task Manager").view(&auth, &MissingThemeProvider);

    assert_eq!(
        view.controls,
        vec![HeaderControl::AccountMenu {
            after_sign_out_url: "/".to_string(),
        }]
    );
    assert_eq!(
        view.session.map(|s| s.display_name),
        Some("ada".to_string())
    );
    assert_eq!(view.brand, "Task Manager");
}

#[test]
fn theme_toggle_round_trips() {
    let theme = ToggleTheme {
        dark: AtomicBool::new(false),
    };

    assert_eq!(theme.toggle(), Theme::Dark);
    assert_eq!(theme.current(), Theme::Dark);
    assert_eq!(theme.toggle(), Theme::Light);
    assert_eq!(theme.current(), Theme::Light);
}

#[tokio::test]
async fn missing_auth_provider_rejects_every_trigger() {
    assert!(MissingAuthProvider.sign_in().await.is_err());
    assert!(MissingAuthProvider.sign_up().await.is_err());
    assert!(MissingAuthProvider.sign_out().await.is_err());
}

#[tokio::test]
async fn fake_sign_out_reports_the_redirect_target() {
    let auth = FakeAuth { session: None };
    assert_eq!(auth.sign_out().await.expect("sign out"), "/");
}
