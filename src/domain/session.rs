use serde::{Deserialize, Serialize};

use super::{nullable, RestaurantId, UserId};

/// An authenticated user, as returned by login/register and kept by a session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    #[serde(rename = "type", default = "bearer")]
    pub token_type: String,
    pub id: UserId,
    pub username: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub roles: Vec<String>,
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
}

fn bearer() -> String {
    "Bearer".to_string()
}

impl Session {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
