use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing::debug;

use crate::auth::repo_types::UserRecord;
use crate::storage::{KvOp, KvStore};

pub const USERS_KEY: &str = "users";
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Outcome of [`CredentialStore::create_and_activate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    Yes,
    DuplicateEmail,
}

/// User collection and current-user pointer on top of a [`KvStore`].
#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KvStore>,
    // serializes read-check-append on the collection
    registration: Arc<Mutex<()>>,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            registration: Arc::new(Mutex::new(())),
        }
    }

    /// `None` when the collection has never been written.
    pub async fn load_users(&self) -> anyhow::Result<Option<Vec<UserRecord>>> {
        let Some(raw) = self.kv.get(USERS_KEY).await? else {
            return Ok(None);
        };
        let users = serde_json::from_str(&raw).context("decode users collection")?;
        Ok(Some(users))
    }

    /// Append `user` and make it the current user in one batch, unless the
    /// email is already taken.
    pub async fn create_and_activate(&self, user: UserRecord) -> anyhow::Result<Created> {
        let _guard = self.registration.lock().await;

        let mut users = self.load_users().await?.unwrap_or_default();
        if users.iter().any(|u| u.has_email(&user.email)) {
            return Ok(Created::DuplicateEmail);
        }

        let current = serde_json::to_string(&user).context("encode current user")?;
        users.push(user);
        let collection = serde_json::to_string(&users).context("encode users collection")?;

        self.kv
            .apply(vec![
                KvOp::put(USERS_KEY, collection),
                KvOp::put(CURRENT_USER_KEY, current),
            ])
            .await
            .context("persist registration")?;
        debug!(total = users.len(), "user appended");
        Ok(Created::Yes)
    }

    pub async fn set_current(&self, user: &UserRecord) -> anyhow::Result<()> {
        let raw = serde_json::to_string(user).context("encode current user")?;
        self.kv
            .set(CURRENT_USER_KEY, raw)
            .await
            .context("persist current user")
    }

    pub async fn current(&self) -> anyhow::Result<Option<UserRecord>> {
        let Some(raw) = self.kv.get(CURRENT_USER_KEY).await? else {
            return Ok(None);
        };
        let user = serde_json::from_str(&raw).context("decode current user")?;
        Ok(Some(user))
    }

    pub async fn clear_current(&self) -> anyhow::Result<()> {
        self.kv
            .remove(CURRENT_USER_KEY)
            .await
            .context("clear current user")
    }
}
