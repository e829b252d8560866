//! Authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, RegisterRequest, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user and return a token plus the created user
    pub async fn register(&self, request: RegisterRequest) -> AppResult<(String, User)> {
        request.validate()?;

        if self
            .repository
            .users
            .get_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = Self::hash_password(&request.password)?;

        let user = self
            .repository
            .users
            .create(&request.username, &request.email, &password_hash, request.role)
            .await?;

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Authenticate by email and password and return a token plus the user
    pub async fn login(&self, request: LoginRequest) -> AppResult<(String, User)> {
        request.validate()?;

        let user = self
            .repository
            .users
            .get_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid email or password".to_string())
            })?;

        if !Self::verify_password(&user.password, &request.password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Get the profile of the authenticated user
    pub async fn profile(&self, user_id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(user_id).await
    }

    /// Create a JWT token for the given user
    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = AuthService::hash_password("hunter42").unwrap();
        assert!(AuthService::verify_password(&hash, "hunter42").unwrap());
        assert!(!AuthService::verify_password(&hash, "hunter43").unwrap());
    }
}
