use actix_web::web;
use bcrypt::{hash, hash_with_salt, verify};

use crate::error::AppError;

/// Salted bcrypt hashing with a configurable work factor.
///
/// The salt is random per call and embedded in the digest, so hashing the same
/// password twice yields two different digests that both verify.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        Ok(hash(password, self.cost)?)
    }

    /// Returns `false` for a wrong password and for a digest bcrypt cannot parse.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("Rejecting malformed password digest: {}", e);
                false
            }
        }
    }

    /// Does the same bcrypt work as a [`PasswordHasher::verify`] at this cost and always
    /// returns `false`. Used when there is no stored digest to check against.
    pub fn verify_missing(&self, password: &str) -> bool {
        if let Err(e) = hash_with_salt(password, self.cost, [0u8; 16]) {
            log::warn!("Dummy password check failed: {}", e);
        }
        false
    }

    /// Runs [`PasswordHasher::hash`] on the blocking thread pool.
    pub async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = *self;
        web::block(move || hasher.hash(&password)).await?
    }

    /// Runs [`PasswordHasher::verify`] on the blocking thread pool.
    pub async fn verify_blocking(
        &self,
        password: String,
        hashed_password: String,
    ) -> Result<bool, AppError> {
        let hasher = *self;
        Ok(web::block(move || hasher.verify(&password, &hashed_password)).await?)
    }

    /// Runs [`PasswordHasher::verify_missing`] on the blocking thread pool.
    pub async fn verify_missing_blocking(&self, password: String) -> Result<bool, AppError> {
        let hasher = *self;
        Ok(web::block(move || hasher.verify_missing(&password)).await?)
    }
}
