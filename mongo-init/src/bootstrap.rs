//! The bootstrap sequence
//!
//! Two steps, strictly in order: authenticate as the root user, then create the
//! application user. Any failure ends the sequence; nothing is retried or
//! rolled back.

use crate::admin::{AdminConnector, AdminSession};
use crate::config::BootstrapConfig;
use crate::error::BootstrapError;
use std::time::Instant;
use tracing::{info, instrument};

/// Outcome of a successful bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapReport {
    pub username: String,
    pub database: String,
    pub roles: Vec<String>,
    pub duration_ms: u64,
}

#[instrument(skip_all, fields(database = %config.app_user.database))]
pub async fn run<C: AdminConnector>(
    connector: &C,
    config: &BootstrapConfig,
) -> Result<BootstrapReport, BootstrapError> {
    let start = Instant::now();

    info!(admin = %config.admin.username, "Authenticating against admin database");
    let session = connector.authenticate(&config.admin).await?;

    let user = &config.app_user;
    info!(username = %user.username, roles = ?user.roles, "Creating application user");
    session.create_user(user).await?;

    Ok(BootstrapReport {
        username: user.username.clone(),
        database: user.database.clone(),
        roles: user.roles.clone(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdminCredentials, AppUser};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// In-memory stand-in for the engine's user store.
    #[derive(Default)]
    struct UserStore {
        users: Mutex<Vec<AppUser>>,
        create_calls: AtomicUsize,
    }

    impl UserStore {
        fn users(&self) -> Vec<AppUser> {
            self.users.lock().unwrap().clone()
        }
    }

    struct MemoryEngine {
        root: AdminCredentials,
        store: Arc<UserStore>,
    }

    impl MemoryEngine {
        fn new() -> Self {
            Self {
                root: AdminCredentials {
                    username: "root".to_string(),
                    password: "example".to_string(),
                },
                store: Arc::new(UserStore::default()),
            }
        }
    }

    struct MemorySession {
        store: Arc<UserStore>,
    }

    impl AdminConnector for MemoryEngine {
        type Session = MemorySession;

        async fn authenticate(
            &self,
            credentials: &AdminCredentials,
        ) -> Result<MemorySession, BootstrapError> {
            if credentials != &self.root {
                return Err(BootstrapError::AuthenticationFailed(
                    "Authentication failed.".to_string(),
                ));
            }
            Ok(MemorySession {
                store: Arc::clone(&self.store),
            })
        }
    }

    impl AdminSession for MemorySession {
        async fn create_user(&self, user: &AppUser) -> Result<(), BootstrapError> {
            self.store.create_calls.fetch_add(1, Ordering::SeqCst);

            let mut users = self.store.users.lock().unwrap();
            if users
                .iter()
                .any(|u| u.username == user.username && u.database == user.database)
            {
                return Err(BootstrapError::UserAlreadyExists {
                    username: user.username.clone(),
                    database: user.database.clone(),
                });
            }
            users.push(user.clone());
            Ok(())
        }
    }

    fn config(admin_password: &str) -> BootstrapConfig {
        BootstrapConfig {
            uri: "mongodb://localhost:27017".to_string(),
            admin: AdminCredentials {
                username: "root".to_string(),
                password: admin_password.to_string(),
            },
            app_user: AppUser::default(),
            server_selection_timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_creates_exactly_one_user() {
        let engine = MemoryEngine::new();

        let report = run(&engine, &config("example")).await.unwrap();
        assert_eq!(report.username, "local");
        assert_eq!(report.database, "employee-service");
        assert_eq!(report.roles, vec!["readWrite"]);

        let users = engine.store.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "local");
        assert_eq!(users[0].password, "local");
        assert_eq!(users[0].roles, vec!["readWrite"]);
        assert_eq!(users[0].database, "employee-service");
    }

    #[tokio::test]
    async fn test_wrong_admin_password_stops_before_create() {
        let engine = MemoryEngine::new();

        let err = run(&engine, &config("wrong")).await.unwrap_err();
        assert!(matches!(err, BootstrapError::AuthenticationFailed(_)));
        assert_eq!(err.phase(), "authenticate");
        assert_eq!(engine.store.create_calls.load(Ordering::SeqCst), 0);
        assert!(engine.store.users().is_empty());
    }

    #[tokio::test]
    async fn test_existing_user_is_not_touched() {
        let engine = MemoryEngine::new();
        let existing = AppUser {
            password: "original".to_string(),
            ..AppUser::default()
        };
        engine.store.users.lock().unwrap().push(existing.clone());

        let err = run(&engine, &config("example")).await.unwrap_err();
        assert_eq!(
            err,
            BootstrapError::UserAlreadyExists {
                username: "local".to_string(),
                database: "employee-service".to_string(),
            }
        );
        assert_eq!(engine.store.users(), vec![existing]);
    }

    #[tokio::test]
    async fn test_second_run_fails() {
        let engine = MemoryEngine::new();
        let config = config("example");

        assert!(run(&engine, &config).await.is_ok());
        let err = run(&engine, &config).await.unwrap_err();

        assert_eq!(err.phase(), "create_user");
        assert_eq!(engine.store.create_calls.load(Ordering::SeqCst), 2);
        assert_eq!(engine.store.users().len(), 1);
    }

    #[tokio::test]
    async fn test_same_username_on_other_database_is_separate() {
        let engine = MemoryEngine::new();
        engine.store.users.lock().unwrap().push(AppUser {
            database: "inventory".to_string(),
            ..AppUser::default()
        });

        run(&engine, &config("example")).await.unwrap();
        assert_eq!(engine.store.users().len(), 2);
    }
}
