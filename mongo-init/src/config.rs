//! Bootstrap configuration
//!
//! Admin credentials are injected by the container runtime. The application
//! user defaults to the literal values the init hook has always used and can be
//! overridden per variable.

use crate::error::BootstrapError;
use common::ConfigExt;
use std::fmt;
use std::time::Duration;

/// Built-in database used for authentication and user administration.
pub const ADMIN_DATABASE: &str = "admin";

pub const ADMIN_USERNAME_ENV: &str = "MONGO_INITDB_ROOT_USERNAME";
pub const ADMIN_PASSWORD_ENV: &str = "MONGO_INITDB_ROOT_PASSWORD";

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_APP_USERNAME: &str = "local";
pub const DEFAULT_APP_PASSWORD: &str = "local";
pub const DEFAULT_APP_ROLES: &str = "readWrite";
pub const DEFAULT_APP_DATABASE: &str = "employee-service";
pub const DEFAULT_SERVER_SELECTION_TIMEOUT_SECS: u64 = 30;

/// Root credentials, authenticated against [`ADMIN_DATABASE`].
#[derive(Clone, PartialEq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The user created on the target database.
#[derive(Clone, PartialEq)]
pub struct AppUser {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
    pub database: String,
}

impl Default for AppUser {
    fn default() -> Self {
        Self {
            username: DEFAULT_APP_USERNAME.to_string(),
            password: DEFAULT_APP_PASSWORD.to_string(),
            roles: vec![DEFAULT_APP_ROLES.to_string()],
            database: DEFAULT_APP_DATABASE.to_string(),
        }
    }
}

impl fmt::Debug for AppUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("roles", &self.roles)
            .field("database", &self.database)
            .finish()
    }
}

/// Configuration for the bootstrap process
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub uri: String,
    pub admin: AdminCredentials,
    pub app_user: AppUser,
    pub server_selection_timeout: Duration,
}

impl BootstrapConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BootstrapError> {
        let admin = AdminCredentials {
            username: required(ADMIN_USERNAME_ENV)?,
            password: required(ADMIN_PASSWORD_ENV)?,
        };

        let app_user = AppUser {
            username: String::env_or("MONGO_APP_USERNAME", DEFAULT_APP_USERNAME),
            password: String::env_or("MONGO_APP_PASSWORD", DEFAULT_APP_PASSWORD),
            roles: String::env_list("MONGO_APP_ROLES", DEFAULT_APP_ROLES),
            database: String::env_or("MONGO_APP_DATABASE", DEFAULT_APP_DATABASE),
        };

        if app_user.roles.is_empty() {
            return Err(BootstrapError::InvalidConfig(
                "MONGO_APP_ROLES must name at least one role".to_string(),
            ));
        }

        Ok(Self {
            uri: String::env_or("MONGO_INIT_URI", DEFAULT_URI),
            admin,
            app_user,
            server_selection_timeout: Duration::from_secs(u64::env_parse(
                "MONGO_INIT_SERVER_SELECTION_TIMEOUT",
                DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
            )),
        })
    }
}

fn required(name: &str) -> Result<String, BootstrapError> {
    String::env_required(name).map_err(|_| BootstrapError::MissingCredential(name.to_string()))
}
