//! User collection: registration, authentication and username rules.

use std::path::PathBuf;

use notes_types::User;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::error::{NotesError, NotesResult};
use crate::store::FileStore;

/// File stem of the shared user collection. Not available as a username.
pub const USERS_FILE_STEM: &str = "users";

const MAX_USERNAME_LEN: usize = 64;

/// Usernames double as file stems, so only a conservative alphabet is allowed.
pub fn validate_username(username: &str) -> NotesResult<()> {
    let invalid = |reason: &str| Err(NotesError::InvalidUsername(reason.to_string()));

    if username.is_empty() {
        return invalid("username must not be empty");
    }
    if username.len() > MAX_USERNAME_LEN {
        return invalid("username is too long");
    }
    if username.starts_with('.') {
        return invalid("username must not start with '.'");
    }
    if username == USERS_FILE_STEM {
        return invalid("username is reserved");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return invalid("only letters, digits, '_', '-' and '.' are allowed");
    }
    Ok(())
}

/// SHA-256 of the password as 64 lowercase hex characters.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub struct UserRepository {
    store: FileStore,
    path: PathBuf,
    // held across every load-mutate-save cycle on the user collection
    write_lock: Mutex<()>,
}

impl UserRepository {
    pub fn new(store: FileStore) -> Self {
        let path = store.path_for(USERS_FILE_STEM);
        Self {
            store,
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn load_all(&self) -> NotesResult<Vec<User>> {
        self.store.read(&self.path)
    }

    pub fn save_all(&self, users: &[User]) -> NotesResult<()> {
        self.store.write(&self.path, users)
    }

    pub fn count(&self) -> NotesResult<usize> {
        Ok(self.load_all()?.len())
    }

    pub fn register(&self, username: &str, password: &str) -> NotesResult<()> {
        validate_username(username)?;

        let _guard = self.write_lock.lock();
        let mut users = self.load_all()?;
        if users.iter().any(|u| u.username == username) {
            return Err(NotesError::AlreadyExists);
        }

        users.push(User {
            username: username.to_string(),
            password: hash_password(password),
        });
        self.save_all(&users)?;

        log::info!("Registered user {}", username);
        Ok(())
    }

    /// Accounts stored before username rules existed may match here but
    /// cannot own a note file, so they are refused with `InvalidUsername`.
    pub fn authenticate(&self, username: &str, password: &str) -> NotesResult<User> {
        let hashed = hash_password(password);
        let user = self
            .load_all()?
            .into_iter()
            .find(|u| u.username == username && u.password == hashed)
            .ok_or(NotesError::InvalidCredentials)?;
        validate_username(&user.username)?;
        Ok(user)
    }
}
