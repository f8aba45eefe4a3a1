//! User accounts and authentication.
//!
//! Credentials are stored as salted Argon2id hashes; authentication
//! never reveals whether the email or the password was wrong.

use crate::error::{PortalError, Result};
use crate::store::table::{Record, Table};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            _ => Err(format!("unknown role '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub department: String,
    pub year: String,
    pub created_at: String,
    pub last_login: String,
}

impl Record for User {
    fn id(&self) -> &str {
        &self.user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub department: String,
    pub year: String,
}

/// The authenticated identity for one interactive session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub role: Role,
}

pub struct AuthManager {
    table: Table<User>,
}

impl AuthManager {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let table = Table::open(&data_dir.join("users.csv"))?;
        Ok(Self { table })
    }

    /// Registers a student account. Emails are unique case-insensitively.
    pub fn register(&mut self, new_user: NewUser) -> Result<User> {
        self.register_with_role(new_user, Role::Student)
    }

    fn register_with_role(&mut self, new_user: NewUser, role: Role) -> Result<User> {
        let email = new_user.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(PortalError::InvalidInput(format!(
                "'{}' is not a valid email address",
                new_user.email
            )));
        }
        if self.find_by_email(&email).is_some() {
            return Err(PortalError::Auth("Email already registered".to_string()));
        }

        let user = User {
            user_id: self.table.next_id("USR"),
            email,
            password_hash: hash_password(&new_user.password)?,
            role,
            name: new_user.name,
            department: new_user.department,
            year: new_user.year,
            created_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            last_login: String::new(),
        };
        self.table.insert(user.clone())?;
        Ok(user)
    }

    /// Verifies credentials and records the login time.
    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<Session> {
        let invalid = || PortalError::Auth("Invalid email or password".to_string());

        let user = self
            .find_by_email(&email.trim().to_lowercase())
            .cloned()
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash) {
            return Err(invalid());
        }

        let now = Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
        self.table.update(&user.user_id, |u| u.last_login = now)?;

        Ok(Session {
            user_id: user.user_id,
            name: user.name,
            role: user.role,
        })
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        let email = email.to_lowercase();
        self.table
            .rows()
            .iter()
            .find(|u| u.email.to_lowercase() == email)
    }

    pub fn get(&self, user_id: &str) -> Option<&User> {
        self.table.get(user_id)
    }

    pub fn all(&self) -> &[User] {
        self.table.rows()
    }

    pub fn delete(&mut self, user_id: &str) -> Result<bool> {
        Ok(self.table.remove(user_id)?.is_some())
    }

    /// Seeds the default admin and student accounts when the table is
    /// empty. Returns the number of accounts created.
    pub fn bootstrap_defaults(&mut self) -> Result<usize> {
        if !self.table.is_empty() {
            return Ok(0);
        }

        self.register_with_role(
            NewUser {
                email: "admin@atlas.edu".to_string(),
                password: "admin123".to_string(),
                name: "Admin User".to_string(),
                department: "Administration".to_string(),
                year: "NA".to_string(),
            },
            Role::Admin,
        )?;
        self.register_with_role(
            NewUser {
                email: "student@atlas.edu".to_string(),
                password: "student123".to_string(),
                name: "Student User".to_string(),
                department: "Computer Science".to_string(),
                year: "Third Year".to_string(),
            },
            Role::Student,
        )?;
        Ok(2)
    }
}

/// Gate for admin-only operations.
pub fn require_admin(session: &Session) -> Result<()> {
    if session.role != Role::Admin {
        return Err(PortalError::Auth(
            "You don't have permission to perform this action".to_string(),
        ));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PortalError::Auth(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
