use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account as persisted in the local credential store.
///
/// `password_hash` stays inside the core; anything handed to a rendering
/// collaborator goes through [`Account::public_view`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub business_type: String,
    pub registered_date: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

impl Account {
    /// Sanitized snapshot without the credential material.
    pub fn public_view(&self) -> AccountView {
        AccountView {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            business_type: self.business_type.clone(),
            registered_date: self.registered_date,
            last_login: self.last_login,
        }
    }
}

/// Account representation safe to serialize toward the view layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub business_type: String,
    pub registered_date: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

/// Raw intake-form payload for a registration attempt. Validation happens in
/// the session manager, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub business_type: String,
}

static ACCOUNT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Time-derived identifier with a process-local sequence suffix so that
/// registrations landing in the same millisecond stay distinct.
pub(crate) fn next_account_id(now: DateTime<Utc>) -> String {
    let seq = ACCOUNT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{seq:04}", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_ids_are_unique_within_a_millisecond() {
        let now = Utc::now();
        let first = next_account_id(now);
        let second = next_account_id(now);
        assert_ne!(first, second);
        assert!(first.starts_with(&now.timestamp_millis().to_string()));
    }

    #[test]
    fn public_view_carries_no_credential_material() {
        let now = Utc::now();
        let account = Account {
            id: next_account_id(now),
            name: "Asha Rao".to_string(),
            email: "asha@example.test".to_string(),
            username: "asha".to_string(),
            password_hash: "v1$ab$cd".to_string(),
            business_type: "proprietorship".to_string(),
            registered_date: now,
            last_login: now,
        };

        let rendered =
            serde_json::to_string(&account.public_view()).expect("view serializes");
        assert!(!rendered.contains("password"));
        assert!(!rendered.contains("v1$ab$cd"));
        assert!(rendered.contains("asha"));
    }
}
