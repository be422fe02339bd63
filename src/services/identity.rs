use std::sync::Arc;

use validator::Validate;

use super::run_blocking;
use crate::auth::{LoginRequest, PasswordHasher, SignUpRequest, TokenService};
use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::store::UserStore;

/// Verified against when the username is unknown, so both login failures cost one bcrypt check.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-users";

/// Signup and login on top of the password hasher and token service.
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    dummy_hash: String,
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Result<Self, AppError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            users,
            hasher,
            tokens,
            dummy_hash,
        })
    }

    /// Registers a new user. The password is hashed before it reaches storage.
    ///
    /// Fails with `DuplicateIdentity` when the username or email is already taken.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<User, AppError> {
        request.validate()?;

        let SignUpRequest {
            username,
            email,
            password,
        } = request;
        let hasher = self.hasher;
        let password_hash = run_blocking(move || hasher.hash(&password)).await??;

        let user = self
            .users
            .create_user(NewUser {
                username,
                email,
                password_hash,
            })
            .await?;

        log::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Checks credentials and issues a token.
    ///
    /// An unknown username and a wrong password both fail with `InvalidCredentials`.
    pub async fn log_in(&self, request: LoginRequest) -> Result<String, AppError> {
        request.validate()?;

        let user = self.users.find_user_by_username(&request.username).await?;
        let (user_id, stored_hash) = match &user {
            Some(user) => (Some(user.id), user.password_hash.clone()),
            None => (None, self.dummy_hash.clone()),
        };

        let hasher = self.hasher;
        let password = request.password;
        let password_matches =
            run_blocking(move || hasher.verify(&password, &stored_hash)).await?;

        match user_id {
            Some(user_id) if password_matches => {
                let token = self.tokens.issue(user_id)?;
                log::info!("User {} logged in", user_id);
                Ok(token)
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    /// Loads the profile of an authenticated user.
    pub async fn current_user(&self, user_id: i64) -> Result<User, AppError> {
        self.users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
