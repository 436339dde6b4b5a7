// file: src/models/admin.rs
// description: tenant and user records exposed by the backend admin endpoints
// reference: GET/POST /tenants, POST /users

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tenant {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTenant {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub tenant_id: String,
    pub email: String,
    pub role: String,
}

#[derive(Clone, Serialize)]
pub struct NewUser {
    pub tenant_id: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl NewUser {
    pub fn new(tenant_id: &str, email: &str, password: &str, role: Option<&str>) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.unwrap_or("user").to_string(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("tenant_id", &self.tenant_id)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}
