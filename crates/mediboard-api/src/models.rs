//! Wire models
//!
//! Field names on the wire follow the server's contract (`_id`, `nombre`,
//! `usuario`, ...); serde renames keep the Rust side readable.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN_ROLE")]
    Admin,
    #[default]
    #[serde(rename = "USER_ROLE")]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN_ROLE",
            Role::User => "USER_ROLE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    /// Reference to the profile image stored server-side.
    #[serde(rename = "img", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Whether the account was created through federated (Google) login.
    #[serde(default)]
    pub google: bool,
}

/// Local login credentials.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Payload for registering a new user.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "titulo")]
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSection {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "icono")]
    pub icon: String,
    #[serde(rename = "submenu")]
    pub items: Vec<MenuItem>,
}

/// Ordered sidebar menu. Served from local config in this build, but
/// transported through login responses for future server-driven menus.
pub type Menu = Vec<MenuSection>;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub id: String,
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: User,
    #[serde(default)]
    pub menu: Menu,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenewResponse {
    pub token: String,
}

/// One page of the user listing.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    #[serde(rename = "usuarios")]
    pub users: Vec<User>,
    #[serde(default)]
    pub total: u64,
}

/// `{ usuario }` envelope used by the CRUD and upload endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserEnvelope {
    #[serde(rename = "usuario")]
    pub user: User,
}

/// Error body: `{ mensaje, errors: { message } }`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(default)]
    pub errors: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_wire_names() {
        let json = r#"{
            "_id": "u1",
            "nombre": "Ada",
            "email": "ada@test.com",
            "img": "u1.png",
            "role": "ADMIN_ROLE",
            "google": false
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.image.as_deref(), Some("u1.png"));
        assert_eq!(user.role, Role::Admin);

        let out = serde_json::to_value(&user).unwrap();
        assert_eq!(out["_id"], "u1");
        assert_eq!(out["nombre"], "Ada");
        assert_eq!(out["role"], "ADMIN_ROLE");
    }

    #[test]
    fn test_user_defaults() {
        // Minimal record: no image, no role, no google flag
        let json = r#"{ "_id": "u2", "nombre": "Bob", "email": "bob@test.com" }"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.role, Role::User);
        assert!(!user.google);
        assert!(user.image.is_none());

        // Absent image must not serialize as null
        let out = serde_json::to_value(&user).unwrap();
        assert!(out.get("img").is_none());
    }

    #[test]
    fn test_login_response() {
        let json = r#"{
            "ok": true,
            "id": "u1",
            "token": "jwt-abc",
            "usuario": { "_id": "u1", "nombre": "Ada", "email": "ada@test.com" },
            "menu": [
                {
                    "titulo": "Main",
                    "icono": "mdi mdi-gauge",
                    "submenu": [ { "titulo": "Dashboard", "url": "/dashboard" } ]
                }
            ]
        }"#;

        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "jwt-abc");
        assert_eq!(resp.user.email, "ada@test.com");
        assert_eq!(resp.menu.len(), 1);
        assert_eq!(resp.menu[0].items[0].url, "/dashboard");
    }

    #[test]
    fn test_error_body() {
        let json = r#"{
            "ok": false,
            "mensaje": "Credenciales incorrectas",
            "errors": { "message": "email not found" }
        }"#;

        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.message, "Credenciales incorrectas");
        assert_eq!(
            body.errors.and_then(|e| e.message).as_deref(),
            Some("email not found")
        );
    }
}
