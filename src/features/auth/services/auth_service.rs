use std::sync::Arc;

use crate::core::config::BootstrapAdmin;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    LoginRequestDto, MeResponseDto, RegisterRequestDto, TokenResponseDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::{PasswordService, TokenService};
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::{NewUser, UserRole};
use crate::features::users::repositories::UserRepository;

const INVALID_CREDENTIALS: &str = "Incorrect email or password";

/// Service for authentication operations (register, login)
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: PasswordService,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: PasswordService,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new account
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<UserResponseDto> {
        let role = match dto.role.as_deref() {
            Some(role) => role.parse::<UserRole>()?,
            None => UserRole::default(),
        };
        let email = dto.email.trim().to_lowercase();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let password_hash = self.hash_password(dto.password).await?;
        let user = self
            .users
            .insert(NewUser {
                username: dto.username,
                email,
                password_hash,
                role,
            })
            .await?;

        tracing::info!("User registered: id={}, role={}", user.id, user.role);
        Ok(user.into())
    }

    /// Login with email and password
    ///
    /// Unknown email, wrong password and inactive account all answer with the
    /// same `Unauthorized` message.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<TokenResponseDto> {
        let email = dto.email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !self
            .verify_password(user.password_hash.clone(), dto.password)
            .await?
        {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            tracing::warn!("Login refused for inactive user: id={}", user.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.tokens.issue(&user)
    }

    /// Current account record for a verified token
    ///
    /// A token can outlive its account; such a token no longer authenticates.
    pub async fn current_user(&self, user: &AuthenticatedUser) -> Result<MeResponseDto> {
        self.users
            .find_by_id(user.user_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))
    }

    /// Make sure the configured admin account exists
    ///
    /// Does nothing when an account with that email is already present,
    /// whatever its role.
    pub async fn ensure_admin(&self, admin: &BootstrapAdmin) -> Result<()> {
        let email = admin.email.trim().to_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            tracing::debug!("Bootstrap admin already present: {}", email);
            return Ok(());
        }

        let password_hash = self.hash_password(admin.password.clone()).await?;
        let user = self
            .users
            .insert(NewUser {
                username: admin.username.clone(),
                email,
                password_hash,
                role: UserRole::Admin,
            })
            .await?;

        tracing::info!("Bootstrap admin created: id={}", user.id);
        Ok(())
    }

    async fn hash_password(&self, password: String) -> Result<String> {
        let passwords = self.passwords.clone();
        tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, stored_hash: String, password: String) -> Result<bool> {
        let passwords = self.passwords.clone();
        tokio::task::spawn_blocking(move || passwords.verify(&stored_hash, &password))
            .await
            .map_err(|e| {
                AppError::Internal(format!("Password verification task failed: {}", e))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::shared::test_helpers::{test_auth_service, InMemoryStore};
    use fake::faker::internet::en::{FreeEmail, Username};
    use fake::Fake;

    fn register_dto(email: &str, password: &str) -> RegisterRequestDto {
        let username: String = Username().fake();
        RegisterRequestDto {
            username: format!("u_{}", username.replace('.', "_")),
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        }
    }

    fn login_dto(email: &str, password: &str) -> LoginRequestDto {
        LoginRequestDto {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let store = Arc::new(InMemoryStore::default());
        let service = test_auth_service(store.clone());
        let email: String = FreeEmail().fake();

        let user = service
            .register(register_dto(&email, "secreto1"))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Cliente);

        let stored = store.find_by_email(&email.to_lowercase()).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secreto1");
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_and_keeps_original() {
        let store = Arc::new(InMemoryStore::default());
        let service = test_auth_service(store.clone());

        let first = service
            .register(register_dto("armando@bucle.app", "secreto1"))
            .await
            .unwrap();
        let err = service
            .register(register_dto("armando@bucle.app", "otraclave"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let stored = store.find_by_email("armando@bucle.app").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert!(service
            .login(login_dto("armando@bucle.app", "secreto1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let service = test_auth_service(Arc::new(InMemoryStore::default()));
        let mut dto = register_dto("armando@bucle.app", "secreto1");
        dto.role = Some("superuser".to_string());

        assert!(matches!(
            service.register(dto).await,
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_login_issues_token_with_identity_claims() {
        let store = Arc::new(InMemoryStore::default());
        let service = test_auth_service(store.clone());
        let mut dto = register_dto("admin@bucle.app", "admin123");
        dto.role = Some("admin".to_string());
        let user = service.register(dto).await.unwrap();

        let token = service
            .login(login_dto("admin@bucle.app", "admin123"))
            .await
            .unwrap();

        let claims = TokenService::new(&AuthConfig::for_tests())
            .verify(&token.access_token)
            .unwrap();
        assert_eq!(claims.sub, "admin@bucle.app");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.id, user.id.to_string());
    }

    #[tokio::test]
    async fn test_login_failures_share_one_message() {
        let store = Arc::new(InMemoryStore::default());
        let service = test_auth_service(store.clone());
        service
            .register(register_dto("armando@bucle.app", "secreto1"))
            .await
            .unwrap();

        let wrong_password = service
            .login(login_dto("armando@bucle.app", "secreto2"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login_dto("nadie@bucle.app", "secreto1"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_login() {
        let store = Arc::new(InMemoryStore::default());
        let service = test_auth_service(store.clone());
        let user = service
            .register(register_dto("armando@bucle.app", "secreto1"))
            .await
            .unwrap();
        store.set_active(user.id, false);

        assert!(matches!(
            service.login(login_dto("armando@bucle.app", "secreto1")).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_current_user_reads_the_record() {
        let store = Arc::new(InMemoryStore::default());
        let service = test_auth_service(store.clone());
        let user = service
            .register(register_dto("armando@bucle.app", "secreto1"))
            .await
            .unwrap();
        let identity = AuthenticatedUser {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
        };

        let me = service.current_user(&identity).await.unwrap();
        assert_eq!(me.username, user.username);

        store.delete(user.id).await.unwrap();
        assert!(matches!(
            service.current_user(&identity).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let store = Arc::new(InMemoryStore::default());
        let service = test_auth_service(store.clone());
        let admin = BootstrapAdmin {
            username: "AdminBucle".to_string(),
            email: "admin@bucle.app".to_string(),
            password: "admin123".to_string(),
        };

        service.ensure_admin(&admin).await.unwrap();
        service.ensure_admin(&admin).await.unwrap();

        let users = store.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, UserRole::Admin);
    }
}
