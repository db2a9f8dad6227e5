//! Resolving the current user
//!
//! Every way of finding out "who is asking" implements `SessionProvider`.
//! `SessionChain` tries providers in a fixed order and returns the first user
//! it gets; callers never see which provider answered.

use tracing::debug;

use crate::config::Settings;
use crate::error::{BillflowError, BillflowResult};
use crate::models::UserId;

/// Environment variable consulted by [`EnvSession`]
pub const USER_ENV_VAR: &str = "BILLFLOW_USER";

/// Something that can name the current user
pub trait SessionProvider {
    /// Short name used in log and error messages
    fn name(&self) -> &'static str;

    fn current_user(&self) -> BillflowResult<UserId>;
}

/// Reads the user from `BILLFLOW_USER`
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSession;

impl SessionProvider for EnvSession {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn current_user(&self) -> BillflowResult<UserId> {
        let value = std::env::var(USER_ENV_VAR).map_err(|_| {
            BillflowError::NotAuthenticated(format!("{} is not set", USER_ENV_VAR))
        })?;
        value.trim().parse().map_err(|_| {
            BillflowError::NotAuthenticated(format!("{} is not a valid user id: {}", USER_ENV_VAR, value))
        })
    }
}

/// Uses the `default_user` stored in settings
#[derive(Debug, Clone)]
pub struct SettingsSession {
    user: Option<UserId>,
}

impl SettingsSession {
    pub fn new(settings: &Settings) -> Self {
        Self {
            user: settings.default_user,
        }
    }
}

impl SessionProvider for SettingsSession {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn current_user(&self) -> BillflowResult<UserId> {
        self.user.ok_or_else(|| {
            BillflowError::NotAuthenticated("no default user configured (run `billflow init`)".into())
        })
    }
}

/// A fixed user, for tests and embedding
#[derive(Debug, Clone, Copy)]
pub struct StaticSession(pub UserId);

impl SessionProvider for StaticSession {
    fn name(&self) -> &'static str {
        "static"
    }

    fn current_user(&self) -> BillflowResult<UserId> {
        Ok(self.0)
    }
}

/// Tries each provider in order; the first success wins
#[derive(Default)]
pub struct SessionChain {
    providers: Vec<Box<dyn SessionProvider>>,
}

impl SessionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The CLI's order: `BILLFLOW_USER`, then the configured default user
    pub fn standard(settings: &Settings) -> Self {
        Self::new()
            .with(EnvSession)
            .with(SettingsSession::new(settings))
    }

    pub fn with(mut self, provider: impl SessionProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl SessionProvider for SessionChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn current_user(&self) -> BillflowResult<UserId> {
        let mut reasons = Vec::new();

        for provider in &self.providers {
            match provider.current_user() {
                Ok(user) => {
                    debug!(provider = provider.name(), user = %user, "resolved session");
                    return Ok(user);
                }
                Err(e) => reasons.push(format!("{}: {}", provider.name(), e)),
            }
        }

        if reasons.is_empty() {
            reasons.push("no session providers configured".to_string());
        }
        Err(BillflowError::NotAuthenticated(reasons.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl SessionProvider for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn current_user(&self) -> BillflowResult<UserId> {
            Err(BillflowError::NotAuthenticated("expired".into()))
        }
    }

    #[test]
    fn test_chain_falls_back_in_order() {
        let user = UserId::new();
        let chain = SessionChain::new().with(Failing).with(StaticSession(user));
        assert_eq!(chain.current_user().unwrap(), user);
    }

    #[test]
    fn test_chain_first_success_wins() {
        let first = UserId::new();
        let second = UserId::new();
        let chain = SessionChain::new()
            .with(StaticSession(first))
            .with(StaticSession(second));
        assert_eq!(chain.current_user().unwrap(), first);
    }

    #[test]
    fn test_chain_all_failing() {
        let chain = SessionChain::new().with(Failing);
        let err = chain.current_user().unwrap_err();
        assert!(matches!(err, BillflowError::NotAuthenticated(_)));
        assert!(err.to_string().contains("failing"));

        assert!(SessionChain::new().current_user().is_err());
    }

    #[test]
    fn test_settings_session() {
        let mut settings = Settings::default();
        assert!(SettingsSession::new(&settings).current_user().is_err());

        let user = UserId::new();
        settings.default_user = Some(user);
        assert_eq!(SettingsSession::new(&settings).current_user().unwrap(), user);
    }
}
