use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::database::{Database, DatabaseError};
use crate::models::User;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Name is required")]
    EmptyName,
    #[error("Password is required")]
    EmptyPassword,
    #[error("User already exists")]
    UserExists,
    #[error("Invalid email or password")]
    BadCredentials,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// The logged-in principal for this process. Created by `login` (or
/// signup followed by login) and held by the TUI for the lifetime of the
/// session; there is no token layer.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

/// Hash a password with a fresh random salt.
/// Stored form is "salt_hex$digest_hex".
pub fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::random();
    let digest = salted_digest(&salt, password);
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

/// Verify a password against a stored "salt_hex$digest_hex" entry
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let digest = salted_digest(&salt, password);
    hex::encode(digest) == digest_hex
}

fn salted_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Loose email shape check: one '@' with a dotted domain whose segments are
/// all non-empty
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && domain.split('.').all(|segment| !segment.is_empty())
}

/// Register a new user. Rejects malformed emails, empty fields, and
/// duplicate email addresses. Returns the new user's ID.
pub fn signup(db: &Database, name: &str, email: &str, password: &str) -> Result<i64, AuthError> {
    if !is_valid_email(email) {
        return Err(AuthError::InvalidEmail);
    }
    if name.trim().is_empty() {
        return Err(AuthError::EmptyName);
    }
    if password.is_empty() {
        return Err(AuthError::EmptyPassword);
    }
    if db.get_user_by_email(email)?.is_some() {
        return Err(AuthError::UserExists);
    }

    let user = User::new(
        name.trim().to_string(),
        email.to_string(),
        hash_password(password),
    );
    let id = db.insert_user(&user)?;
    log::info!("user created: id={} email={}", id, email);
    Ok(id)
}

/// Check credentials and open a session.
/// A missing user and a wrong password produce the same error.
pub fn login(db: &Database, email: &str, password: &str) -> Result<Session, AuthError> {
    let user = db
        .get_user_by_email(email)?
        .ok_or(AuthError::BadCredentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(AuthError::BadCredentials);
    }

    let user_id = user.id.ok_or(AuthError::BadCredentials)?;
    log::info!("session opened: user_id={}", user_id);
    Ok(Session {
        user_id,
        username: user.username,
        email: user.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("pw"), hash_password("pw"));
    }

    #[test]
    fn verify_rejects_malformed_stored_values() {
        assert!(!verify_password("pw", "not-a-hash"));
        assert!(!verify_password("pw", "zz$zz"));
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a-b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a@b..co"));
    }

    #[test]
    fn signup_rejects_duplicates_and_login_checks_password() {
        let db = Database::open_in_memory().unwrap();
        signup(&db, "Ada", "ada@example.com", "pw").unwrap();

        assert!(matches!(
            signup(&db, "Ada", "ada@example.com", "pw"),
            Err(AuthError::UserExists)
        ));

        let session = login(&db, "ada@example.com", "pw").unwrap();
        assert_eq!(session.username, "Ada");

        assert!(matches!(
            login(&db, "ada@example.com", "wrong"),
            Err(AuthError::BadCredentials)
        ));
        assert!(matches!(
            login(&db, "nobody@example.com", "pw"),
            Err(AuthError::BadCredentials)
        ));
    }
}
