use super::role::Role;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub personal_id: String, // ⇔ users.personal_id (UNIQUE, used by --as)
    pub role: Role,
    pub created_at: String,
}
