//! Operator session state.
//!
//! Login and inactivity timeout are modeled as a pure reducer: every UI
//! event maps the current session to the next one, with no hidden state.
//! The dashboard owns the current `Session` value and feeds events in.

use serde::{Deserialize, Serialize};

use crate::config::TedTrackConfig;

/// Current operator session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Session {
    pub username: String,
    pub is_logged: bool,
    /// Seconds left before the session expires.
    pub timeout: u32,
}

impl Session {
    /// Session freshly authenticated as `username`.
    pub fn logged_in(username: &str, max_timeout: u32) -> Self {
        Self {
            username: username.to_string(),
            is_logged: true,
            timeout: max_timeout,
        }
    }
}

/// Events produced by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login attempt with the submitted credentials.
    Login { username: String, password: String },
    /// Any operator interaction; resets the inactivity countdown.
    Activity,
    /// One second of wall-clock time elapsed.
    Tick,
    Logout,
}

/// Apply one event to the session. Credentials are checked against the
/// configured operator; an unconfigured (empty) operator never logs in.
pub fn reduce(session: Session, event: &SessionEvent, config: &TedTrackConfig) -> Session {
    match event {
        SessionEvent::Login { username, password } => {
            let op = &config.operator;
            if !op.username.is_empty()
                && !op.password.is_empty()
                && *username == op.username
                && *password == op.password
            {
                Session::logged_in(username, config.session.max_timeout_secs)
            } else {
                session
            }
        }
        SessionEvent::Activity => {
            if session.is_logged {
                Session {
                    timeout: config.session.max_timeout_secs,
                    ..session
                }
            } else {
                session
            }
        }
        SessionEvent::Tick => {
            if !session.is_logged {
                return session;
            }
            let remaining = session.timeout.saturating_sub(1);
            if remaining == 0 {
                Session::default()
            } else {
                Session {
                    timeout: remaining,
                    ..session
                }
            }
        }
        SessionEvent::Logout => Session::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TedTrackConfig;

    fn config_with_operator() -> TedTrackConfig {
        let mut config = TedTrackConfig::default();
        config.operator.username = "chief".into();
        config.operator.password = "hunter2".into();
        config.session.max_timeout_secs = 3;
        config
    }

    #[test]
    fn test_login_success() {
        let config = config_with_operator();
        let event = SessionEvent::Login {
            username: "chief".into(),
            password: "hunter2".into(),
        };
        let session = reduce(Session::default(), &event, &config);
        assert!(session.is_logged);
        assert_eq!(session.username, "chief");
        assert_eq!(session.timeout, 3);
    }

    #[test]
    fn test_login_wrong_password() {
        let config = config_with_operator();
        let event = SessionEvent::Login {
            username: "chief".into(),
            password: "nope".into(),
        };
        let session = reduce(Session::default(), &event, &config);
        assert!(!session.is_logged);
    }

    #[test]
    fn test_login_rejected_when_operator_unconfigured() {
        let config = TedTrackConfig::default();
        let event = SessionEvent::Login {
            username: String::new(),
            password: String::new(),
        };
        let session = reduce(Session::default(), &event, &config);
        assert!(!session.is_logged);
    }

    #[test]
    fn test_tick_counts_down_and_expires() {
        let config = config_with_operator();
        let mut session = Session::logged_in("chief", 2);

        session = reduce(session, &SessionEvent::Tick, &config);
        assert!(session.is_logged);
        assert_eq!(session.timeout, 1);

        session = reduce(session, &SessionEvent::Tick, &config);
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_activity_restores_timeout() {
        let config = config_with_operator();
        let mut session = Session::logged_in("chief", 3);
        session = reduce(session, &SessionEvent::Tick, &config);
        assert_eq!(session.timeout, 2);

        session = reduce(session, &SessionEvent::Activity, &config);
        assert_eq!(session.timeout, 3);
        assert!(session.is_logged);
    }

    #[test]
    fn test_tick_ignored_when_logged_out() {
        let config = config_with_operator();
        let session = reduce(Session::default(), &SessionEvent::Tick, &config);
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_logout_clears_session() {
        let config = config_with_operator();
        let session = reduce(Session::logged_in("chief", 3), &SessionEvent::Logout, &config);
        assert_eq!(session, Session::default());
    }
}
