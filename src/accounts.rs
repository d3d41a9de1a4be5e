//! Registration and login on top of the record store.
//!
//! Passwords are plain text and compared for equality.

use crate::model::{NewUser, User};
use crate::session::Session;
use crate::store::{KvBackend, RecordStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccountError {
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::EmailTaken => "email_taken",
            AccountError::InvalidCredentials => "invalid_credentials",
            AccountError::Store(_) => "store_failed",
        }
    }
}

/// Create an account unless the email is already in use, then log it in.
pub fn register<B: KvBackend>(
    store: &mut RecordStore<B>,
    session: &mut Session,
    new: NewUser,
) -> Result<User, AccountError> {
    if store.user_by_email(&new.email)?.is_some() {
        return Err(AccountError::EmailTaken);
    }
    let user = store.add_user(new)?;
    session.begin(store, &user.id)?;
    Ok(user)
}

pub fn login<B: KvBackend>(
    store: &mut RecordStore<B>,
    session: &mut Session,
    email: &str,
    password: &str,
) -> Result<User, AccountError> {
    let user = match store.user_by_email(email)? {
        Some(u) if u.password == password => u,
        _ => return Err(AccountError::InvalidCredentials),
    };
    session.begin(store, &user.id)?;
    Ok(user)
}

pub fn logout<B: KvBackend>(
    store: &mut RecordStore<B>,
    session: &mut Session,
) -> Result<(), AccountError> {
    session.end(store)?;
    Ok(())
}
