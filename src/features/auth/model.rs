use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::users::models::UserRole;

/// Caller identity attached to a request by the auth middleware
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Claims embedded in an access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email
    pub sub: String,
    pub role: UserRole,
    /// User id as a string
    pub id: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn into_authenticated_user(self) -> Result<AuthenticatedUser, AppError> {
        let user_id = Uuid::parse_str(&self.id)
            .map_err(|_| AppError::Unauthorized("Token carries a malformed user id".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            email: self.sub,
            role: self.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(id: &str) -> Claims {
        Claims {
            sub: "admin@bucle.app".to_string(),
            role: UserRole::Admin,
            id: id.to_string(),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_claims_become_authenticated_user() {
        let id = Uuid::new_v4();
        let user = claims(&id.to_string()).into_authenticated_user().unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.email, "admin@bucle.app");
        assert!(user.is_admin());
    }

    #[test]
    fn test_malformed_id_claim_is_unauthorized() {
        let result = claims("not-a-uuid").into_authenticated_user();
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
