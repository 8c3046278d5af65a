//! Administrative access to the database engine
//!
//! Authentication yields a session; the session is what creates users. The
//! MongoDB implementation talks to the engine through the official driver.

use crate::config::{AdminCredentials, AppUser, BootstrapConfig, ADMIN_DATABASE};
use crate::error::BootstrapError;
use mongodb::bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::{ClientOptions, Credential};
use mongodb::Client;
use std::time::Duration;
use tracing::debug;

/// Engine error codes the bootstrap tells apart.
pub mod codes {
    pub const UNAUTHORIZED: i32 = 13;
    pub const AUTHENTICATION_FAILED: i32 = 18;
    pub const DUPLICATE_KEY: i32 = 11000;
    pub const USER_ALREADY_EXISTS: i32 = 51003;
}

const APP_NAME: &str = "mongo-init";

/// Opens an authenticated administrative session.
#[allow(async_fn_in_trait)]
pub trait AdminConnector {
    type Session: AdminSession;

    async fn authenticate(
        &self,
        credentials: &AdminCredentials,
    ) -> Result<Self::Session, BootstrapError>;
}

/// An authenticated session able to manage users.
#[allow(async_fn_in_trait)]
pub trait AdminSession {
    /// Create `user` on its database. Never updates an existing user.
    async fn create_user(&self, user: &AppUser) -> Result<(), BootstrapError>;
}

/// Connector backed by the MongoDB driver.
pub struct MongoConnector {
    uri: String,
    server_selection_timeout: Duration,
}

impl MongoConnector {
    pub fn new(config: &BootstrapConfig) -> Self {
        Self {
            uri: config.uri.clone(),
            server_selection_timeout: config.server_selection_timeout,
        }
    }
}

impl AdminConnector for MongoConnector {
    type Session = MongoSession;

    async fn authenticate(
        &self,
        credentials: &AdminCredentials,
    ) -> Result<MongoSession, BootstrapError> {
        let mut options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| BootstrapError::InvalidConfig(format!("MONGO_INIT_URI: {}", e)))?;

        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(self.server_selection_timeout);
        options.credential = Some(
            Credential::builder()
                .username(credentials.username.clone())
                .password(credentials.password.clone())
                .source(ADMIN_DATABASE.to_string())
                .build(),
        );

        let client =
            Client::with_options(options).map_err(|e| BootstrapError::Connection(e.to_string()))?;

        // The driver authenticates lazily; the first command forces the handshake.
        client
            .database(ADMIN_DATABASE)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(classify_auth_error)?;

        debug!(username = %credentials.username, "Admin session established");

        Ok(MongoSession { client })
    }
}

/// Session holding an authenticated driver client.
#[derive(Debug)]
pub struct MongoSession {
    client: Client,
}

impl AdminSession for MongoSession {
    async fn create_user(&self, user: &AppUser) -> Result<(), BootstrapError> {
        self.client
            .database(&user.database)
            .run_command(create_user_command(user))
            .await
            .map_err(|e| classify_create_error(e, user))?;

        Ok(())
    }
}

/// The `createUser` command issued against the target database.
pub fn create_user_command(user: &AppUser) -> Document {
    doc! {
        "createUser": user.username.as_str(),
        "pwd": user.password.as_str(),
        "roles": user.roles.clone(),
    }
}

fn classify_auth_error(err: MongoError) -> BootstrapError {
    match err.kind.as_ref() {
        ErrorKind::Authentication { message, .. } => {
            BootstrapError::AuthenticationFailed(message.clone())
        }
        ErrorKind::Command(command) => {
            classify_auth_code(command.code, &command.message)
        }
        _ => BootstrapError::Connection(err.to_string()),
    }
}

fn classify_create_error(err: MongoError, user: &AppUser) -> BootstrapError {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => {
            classify_create_code(command.code, &command.message, user)
        }
        _ => BootstrapError::Command(err.to_string()),
    }
}

/// Map a server error code seen while authenticating.
pub fn classify_auth_code(code: i32, message: &str) -> BootstrapError {
    match code {
        codes::AUTHENTICATION_FAILED | codes::UNAUTHORIZED => {
            BootstrapError::AuthenticationFailed(message.to_string())
        }
        _ => BootstrapError::Connection(format!("{} (code {})", message, code)),
    }
}

/// Map a server error code returned by `createUser`.
pub fn classify_create_code(code: i32, message: &str, user: &AppUser) -> BootstrapError {
    match code {
        // Servers before 4.4 reported duplicates as a plain duplicate key.
        codes::USER_ALREADY_EXISTS | codes::DUPLICATE_KEY => BootstrapError::UserAlreadyExists {
            username: user.username.clone(),
            database: user.database.clone(),
        },
        codes::UNAUTHORIZED => BootstrapError::Unauthorized(message.to_string()),
        _ => BootstrapError::Command(format!("{} (code {})", message, code)),
    }
}
