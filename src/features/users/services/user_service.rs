use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::repositories::UserRepository;

/// Service for user administration
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// List all accounts, newest first
    pub async fn list(&self) -> Result<Vec<UserResponseDto>> {
        let users = self.users.list().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Hard-delete an account; its submissions go with it
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.users.delete(id).await? {
            return Err(AppError::NotFound(format!("User '{}' not found", id)));
        }

        tracing::info!("User deleted with its submissions: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::InMemoryStore;

    #[tokio::test]
    async fn test_delete_unknown_user_is_not_found() {
        let store = Arc::new(InMemoryStore::default());
        let service = UserService::new(store);

        let result = service.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_user_and_submissions() {
        let store = Arc::new(InMemoryStore::default());
        let user = store.seed_user("armando", "armando@bucle.app", UserRole::Cliente);
        let product = store.seed_product("tubo_co2", "TUBO-CO2-STD");
        store.seed_submission(user.id, product.id, 0.8, chrono::Utc::now());

        let service = UserService::new(store.clone());
        service.delete(user.id).await.unwrap();

        assert!(service.list().await.unwrap().is_empty());
        assert_eq!(store.submission_count(), 0);
        assert_eq!(store.product_count(), 1);
    }
}
