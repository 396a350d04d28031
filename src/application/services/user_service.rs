//! User registration and credential checks.

use argon2::Argon2;
use serde_json::json;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::info;
use validator::Validate;

use crate::domain::entities::{NewUser, Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

/// Input for registering a user.
#[derive(Debug, Clone, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: Role,
}

/// Hashes a password with Argon2 and a random salt.
///
/// The result is `hex(salt)$hex(hash)`.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt = [0u8; SALT_LENGTH];
    getrandom::fill(&mut salt).map_err(|e| AppError::internal(e.to_string()))?;

    let hash = derive(password, &salt)?;
    Ok(format!("{}${}", hex::encode(salt), hex::encode(hash)))
}

/// Checks a password against a value produced by [`hash_password`].
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, hash)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (hex::decode(salt), hex::decode(hash)) else {
        return false;
    };

    derive(password, &salt)
        .is_ok_and(|candidate| bool::from(candidate.as_slice().ct_eq(hash.as_slice())))
}

fn derive(password: &str, salt: &[u8]) -> Result<[u8; HASH_LENGTH], AppError> {
    let mut hash = [0u8; HASH_LENGTH];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut hash)
        .map_err(|e| AppError::internal(e.to_string()))?;
    Ok(hash)
}

/// Service for managing users.
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the input is invalid.
    /// Returns [`AppError::Conflict`] if the email is taken.
    pub async fn register(&self, input: RegisterUser) -> Result<User, AppError> {
        input.validate()?;

        let user = self
            .users
            .create(NewUser {
                username: input.username,
                full_name: input.full_name,
                email: input.email,
                password_hash: hash_password(&input.password)?,
                role: input.role,
                external_id: None,
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Creates an admin, or promotes an existing user with the same email
    /// and resets their password.
    ///
    /// Returns the user and whether it was newly created.
    pub async fn ensure_admin(&self, input: RegisterUser) -> Result<(User, bool), AppError> {
        input.validate()?;

        match self.users.find_by_email(&input.email).await? {
            Some(existing) => {
                let user = self
                    .users
                    .update_credentials(existing.id, hash_password(&input.password)?, Role::Admin)
                    .await?;
                info!(user_id = user.id, "Existing user promoted to admin");
                Ok((user, false))
            }
            None => {
                let user = self
                    .register(RegisterUser {
                        role: Role::Admin,
                        ..input
                    })
                    .await?;
                Ok((user, true))
            }
        }
    }

    /// Checks an email and password pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an unknown email or a wrong
    /// password, without saying which.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self.users.find_by_email(email).await?;

        match user {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            _ => Err(AppError::unauthorized(
                "Invalid email or password",
                json!({}),
            )),
        }
    }

    /// Retrieves a user by id.
    pub async fn get(&self, id: i64) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))
    }

    /// Lists all users.
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.users.list().await
    }
}
