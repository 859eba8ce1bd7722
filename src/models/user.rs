//! User identity models and auth request bodies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(ClientError::Validation(format!(
                "Unknown role {}, expected user or admin",
                other
            ))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user as returned by `/auth/me` and `/users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Reference to a user. The server sends either a bare id or a populated user
/// object; both shapes land here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireUserRef", into = "WireUserRef")]
pub struct UserRef {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireUserRef {
    Id(String),
    Embedded {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

impl From<WireUserRef> for UserRef {
    fn from(wire: WireUserRef) -> Self {
        match wire {
            WireUserRef::Id(id) => UserRef {
                id,
                name: None,
                email: None,
            },
            WireUserRef::Embedded { id, name, email } => UserRef { id, name, email },
        }
    }
}

impl From<UserRef> for WireUserRef {
    fn from(user: UserRef) -> Self {
        if user.name.is_none() && user.email.is_none() {
            WireUserRef::Id(user.id)
        } else {
            WireUserRef::Embedded {
                id: user.id,
                name: user.name,
                email: user.email,
            }
        }
    }
}

/// Login request body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Login response body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Request body for creating an account.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() {
            return Err(ClientError::Validation("Name is required".to_string()));
        }
        if !self.email.contains('@') {
            return Err(ClientError::Validation(
                "A valid email address is required".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(ClientError::Validation("Password is required".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_ref_both_shapes() {
        let bare: UserRef = serde_json::from_value(json!("u1")).unwrap();
        assert_eq!(bare.id, "u1");
        assert!(bare.name.is_none());
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!("u1"));

        let embedded: UserRef =
            serde_json::from_value(json!({ "_id": "u2", "name": "Ravi", "role": "admin" }))
                .unwrap();
        assert_eq!(embedded.id, "u2");
        assert_eq!(embedded.name.as_deref(), Some("Ravi"));
    }

    #[test]
    fn test_user_role_defaults_to_user() {
        let user: User =
            serde_json::from_value(json!({ "_id": "u1", "name": "Mei", "email": "mei@example.com" }))
                .unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("a@example.com", "hunter2", Role::Admin);
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("hunter2"));

        let body = serde_json::to_value(&creds).unwrap();
        assert_eq!(body["role"], "admin");
        assert_eq!(body["password"], "hunter2");
    }

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            name: "Mei".to_string(),
            email: "mei@example.com".to_string(),
            password: "pw".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "mei".to_string(),
            ..ok.clone()
        };
        assert!(bad_email.validate().is_err());
    }
}
