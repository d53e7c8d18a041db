//! Local account simulation: durable credential store, salted password
//! hashing, and the single-identity session manager, all over device-local
//! key-value storage.

pub mod domain;
mod password;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{Account, AccountView, RegistrationRequest};
pub use router::auth_router;
pub use service::{AuthError, SessionManager};
pub use store::{CredentialStore, CredentialStoreError};
