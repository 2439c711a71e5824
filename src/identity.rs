//! Identity collaborator: account creation, sign-in and the current session.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::db::{task_repo, user_repo};
use crate::error::KanbanError;
use crate::models::User;
use crate::validation::{LoginForm, SignUpForm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(User),
    SignedOut,
}

pub trait IdentityService {
    fn sign_up(&mut self, form: &SignUpForm) -> Result<User, KanbanError>;
    fn login(&mut self, email: &str, password: &str) -> Result<User, KanbanError>;
    fn sign_out(&mut self) -> Result<(), KanbanError>;
    fn current_user(&self) -> Option<&User>;
    /// Receive a [`SessionEvent`] every time the session changes.
    fn watch_session(&mut self) -> Receiver<SessionEvent>;
}

/// Accounts in the local database; the session lives in the config file.
pub struct LocalIdentity {
    conn: Connection,
    config_path: Option<PathBuf>,
    config: Config,
    current: Option<User>,
    watchers: Vec<Sender<SessionEvent>>,
}

impl LocalIdentity {
    /// Restore the persisted session, if it still names an existing user.
    pub fn open(conn: Connection, config_path: PathBuf) -> Result<Self, KanbanError> {
        let config = Config::load(&config_path)?;
        let current = match config.session_user_id {
            Some(ref id) => user_repo::get_user(&conn, id)?,
            None => None,
        };
        if config.session_user_id.is_some() && current.is_none() {
            tracing::warn!("stale session discarded");
        }
        Ok(Self {
            conn,
            config_path: Some(config_path),
            config,
            current,
            watchers: Vec::new(),
        })
    }

    /// Session kept in memory only.
    pub fn ephemeral(conn: Connection) -> Self {
        Self {
            conn,
            config_path: None,
            config: Config::default(),
            current: None,
            watchers: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn set_session(&mut self, user: Option<User>) -> Result<(), KanbanError> {
        self.config.session_user_id = user.as_ref().map(|u| u.id.clone());
        if let Some(ref path) = self.config_path {
            self.config.save(path)?;
        }
        let event = match user {
            Some(ref u) => SessionEvent::SignedIn(u.clone()),
            None => SessionEvent::SignedOut,
        };
        self.current = user;
        self.watchers.retain(|tx| tx.send(event.clone()).is_ok());
        Ok(())
    }
}

impl IdentityService for LocalIdentity {
    fn sign_up(&mut self, form: &SignUpForm) -> Result<User, KanbanError> {
        form.validate()?;
        let user = User {
            id: ulid::Ulid::new().to_string(),
            email: normalize_email(&form.email),
            display_name: form.name.trim().to_string(),
            created_at: task_repo::now(),
        };
        let salt = ulid::Ulid::new().to_string();
        let hash = hash_password(&salt, &form.password);
        user_repo::insert_user(&self.conn, &user, &salt, &hash)?;
        tracing::info!(user = %user.id, "account created");

        self.set_session(Some(user.clone()))?;
        Ok(user)
    }

    fn login(&mut self, email: &str, password: &str) -> Result<User, KanbanError> {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
        .validate()?;

        let creds = user_repo::find_by_email(&self.conn, &normalize_email(email))?
            .ok_or_else(KanbanError::invalid_credentials)?;
        if hash_password(&creds.salt, password) != creds.hash {
            tracing::warn!(user = %creds.user.id, "rejected login");
            return Err(KanbanError::invalid_credentials());
        }

        self.set_session(Some(creds.user.clone()))?;
        Ok(creds.user)
    }

    fn sign_out(&mut self) -> Result<(), KanbanError> {
        self.set_session(None)
    }

    fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    fn watch_session(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.watchers.push(tx);
        rx
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection;
    use crate::error::ErrorCode;

    fn form(email: &str) -> SignUpForm {
        SignUpForm {
            name: "Ada Lovelace".into(),
            email: email.into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    fn identity() -> LocalIdentity {
        LocalIdentity::ephemeral(connection::open_in_memory().unwrap())
    }

    #[test]
    fn sign_up_signs_in() {
        let mut id = identity();
        let user = id.sign_up(&form("ada@example.com")).unwrap();
        assert_eq!(id.current_user(), Some(&user));
        assert_eq!(user.display_name, "Ada Lovelace");
    }

    #[test]
    fn duplicate_email_is_rejected_case_insensitively() {
        let mut id = identity();
        id.sign_up(&form("ada@example.com")).unwrap();
        let err = id.sign_up(&form("ADA@example.com")).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailTaken);
    }

    #[test]
    fn login_checks_password() {
        let mut id = identity();
        id.sign_up(&form("ada@example.com")).unwrap();
        id.sign_out().unwrap();
        assert!(id.current_user().is_none());

        let err = id.login("ada@example.com", "wrong-password").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        let err = id.login("nobody@example.com", "secret1").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);

        let user = id.login("ada@example.com", "secret1").unwrap();
        assert_eq!(id.current_user().map(|u| &u.id), Some(&user.id));
    }

    #[test]
    fn watchers_see_session_changes() {
        let mut id = identity();
        let rx = id.watch_session();
        let user = id.sign_up(&form("ada@example.com")).unwrap();
        id.sign_out().unwrap();

        let events: Vec<SessionEvent> = rx.try_iter().collect();
        assert_eq!(events, vec![SessionEvent::SignedIn(user), SessionEvent::SignedOut]);
    }

    #[test]
    fn session_persists_through_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = dir.path().join("kanban.db");
        let config_path = dir.path().join("config.json");
        {
            let conn = Connection::open(&db).unwrap();
            crate::db::migrations::run_migrations(&conn).unwrap();
            let mut id = LocalIdentity::open(conn, config_path.clone()).unwrap();
            id.sign_up(&form("ada@example.com")).unwrap();
        }
        let id = LocalIdentity::open(Connection::open(&db).unwrap(), config_path).unwrap();
        assert_eq!(id.current_user().map(|u| u.email.as_str()), Some("ada@example.com"));
    }
}
