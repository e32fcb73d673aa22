//! Login credentials.
//!
//! The password is redacted in Debug output and only ever leaves the process
//! as a SHA-256 digest.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Credentials used for the login handshake.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
    database: String,
    modules: Vec<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("modules", &self.modules)
            .finish()
    }
}

impl Credentials {
    /// Create credentials. `password` may be plain text or a SHA-256 hex digest.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            database: database.into(),
            modules: Vec::new(),
        }
    }

    /// Set the licensed modules requested at login.
    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self
    }

    /// Get the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Get the requested modules.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// The password as sent to the server: unchanged if it already is a
    /// SHA-256 hex digest, hashed otherwise.
    pub fn password_digest(&self) -> String {
        if is_sha256_hex(&self.password) {
            return self.password.to_ascii_lowercase();
        }
        Sha256::digest(self.password.as_bytes())
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// Build the login payload. With volume licensing the module list is
    /// replaced by the volume licence module.
    pub(crate) fn login_payload(&self, volume_licence: bool) -> LoginPayload<'_> {
        let modules = if volume_licence {
            vec![crate::VOLUME_LICENCE_MODULE.to_string()]
        } else {
            self.modules.clone()
        };

        LoginPayload {
            username: &self.username,
            password: self.password_digest(),
            database: DatabasePayload {
                name: &self.database,
            },
            modules,
        }
    }
}

fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Login request body.
#[derive(Debug, Serialize)]
pub(crate) struct LoginPayload<'a> {
    #[serde(rename = "Benutzer", skip_serializing_if = "str::is_empty")]
    username: &'a str,
    #[serde(rename = "Passwort")]
    password: String,
    #[serde(rename = "Datenbank")]
    database: DatabasePayload<'a>,
    #[serde(rename = "Module", skip_serializing_if = "Vec::is_empty")]
    modules: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DatabasePayload<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
}
