// file: src/models/session.rs
// description: authenticated identity persisted between runs
// reference: session persistence keys auth_token, auth_tenant_id, auth_email

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub tenant_id: String,
    pub email: String,
    pub token: String,
}

impl Session {
    pub fn new(tenant_id: &str, email: &str, token: &str) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            email: email.to_string(),
            token: token.to_string(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("tenant_id", &self.tenant_id)
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}
