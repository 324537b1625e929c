//! User model as returned by the API.

use serde::{Deserialize, Serialize};

use super::Id;

/// Role of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

/// Registered user. Read-only from the console's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Department reference, if assigned
    pub department_id: Option<Id>,
    pub is_active: bool,
    /// Audit timestamps (ISO 8601)
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// "First Last", trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Envelope returned by `GET /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    pub data: Vec<User>,
}
