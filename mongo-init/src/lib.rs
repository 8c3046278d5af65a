//! MongoDB first-start bootstrap
//!
//! Authenticates as the root user injected by the container runtime and
//! creates the application's database user.

pub mod admin;
pub mod bootstrap;
pub mod config;
pub mod error;

pub use admin::{AdminConnector, AdminSession, MongoConnector};
pub use bootstrap::{run, BootstrapReport};
pub use config::{AdminCredentials, AppUser, BootstrapConfig};
pub use error::BootstrapError;
