// file: src/session/store.rs
// description: save, restore and clear the authenticated session triple
// reference: Production-grade metadata persistence

use super::storage::KeyValueStorage;
use crate::error::Result;
use crate::models::Session;
use tracing::debug;

pub const TOKEN_KEY: &str = "auth_token";
pub const TENANT_KEY: &str = "auth_tenant_id";
pub const EMAIL_KEY: &str = "auth_email";

pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns a session only when all three keys hold a value. A partial
    /// record counts as no session.
    pub fn restore(&self) -> Result<Option<Session>> {
        let token = self.read(TOKEN_KEY)?;
        let tenant_id = self.read(TENANT_KEY)?;
        let email = self.read(EMAIL_KEY)?;

        match (token, tenant_id, email) {
            (Some(token), Some(tenant_id), Some(email)) => {
                debug!("Restored session for {} in tenant {}", email, tenant_id);
                Ok(Some(Session {
                    tenant_id,
                    email,
                    token,
                }))
            }
            _ => Ok(None),
        }
    }

    pub fn save(&mut self, session: &Session) -> Result<()> {
        self.storage.set(TOKEN_KEY, &session.token)?;
        self.storage.set(TENANT_KEY, &session.tenant_id)?;
        self.storage.set(EMAIL_KEY, &session.email)?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(TENANT_KEY)?;
        self.storage.remove(EMAIL_KEY)?;
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.storage.get(key)?.filter(|value| !value.is_empty()))
    }
}
