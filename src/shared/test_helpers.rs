//! In-memory collaborators for service and router tests.

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::{AuthService, PasswordService, TokenService};
use crate::features::products::models::{NewProduct, Product};
use crate::features::products::repositories::ProductRepository;
use crate::features::submissions::models::{
    IntakeOutcome, NewIntake, PhotoWrite, Submission, SubmissionStatus, SubmissionWithProduct,
};
use crate::features::submissions::repositories::SubmissionRepository;
use crate::features::users::models::{NewUser, User, UserRole};
use crate::features::users::repositories::{user_conflict, UserRepository};
use crate::modules::storage::PhotoStore;
use crate::shared::constants::RETURNED_QUANTITY;

#[derive(Default)]
struct State {
    users: Vec<User>,
    products: Vec<Product>,
    submissions: Vec<Submission>,
}

impl State {
    fn joined(&self, submission: &Submission) -> Option<SubmissionWithProduct> {
        self.products
            .iter()
            .find(|p| p.id == submission.product_id)
            .map(|product| SubmissionWithProduct {
                submission: submission.clone(),
                product: product.clone(),
            })
    }

    fn ledger<F>(&self, filter: F) -> Vec<SubmissionWithProduct>
    where
        F: Fn(&Submission) -> bool,
    {
        let mut entries: Vec<SubmissionWithProduct> = self
            .submissions
            .iter()
            .rev()
            .filter(|s| filter(s))
            .filter_map(|s| self.joined(s))
            .collect();
        entries.sort_by(|a, b| b.submission.submitted_at.cmp(&a.submission.submitted_at));
        entries
    }
}

/// Single store backing all three repositories
///
/// Every operation runs under one mutex. Intakes are additionally serialized
/// by `intake_lock` across the photo write, as the advisory lock does in
/// Postgres, so `record_intake` is all or nothing.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    intake_lock: tokio::sync::Mutex<()>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn seed_user(&self, username: &str, email: &str, role: UserRole) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
        };
        self.lock().users.push(user.clone());
        user
    }

    pub fn set_active(&self, id: Uuid, active: bool) {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.id == id) {
            user.is_active = active;
        }
    }

    pub fn seed_product(&self, name: &str, sku: &str) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            sku: sku.to_string(),
            description: None,
            created_at: Utc::now(),
        };
        self.lock().products.push(product.clone());
        product
    }

    pub fn seed_submission(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        confidence: f64,
        submitted_at: DateTime<Utc>,
    ) -> Submission {
        let submission = Submission {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            submitted_at,
            status: SubmissionStatus::decide(confidence),
            returned_quantity: RETURNED_QUANTITY,
            photo_url: None,
            confidence,
        };
        self.lock().submissions.push(submission.clone());
        submission
    }

    pub fn product_count(&self) -> usize {
        self.lock().products.len()
    }

    pub fn submission_count(&self) -> usize {
        self.lock().submissions.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(user_conflict("users_email_key", &user));
        }
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(user_conflict("users_username_key", &user));
        }

        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: true,
            created_at: Utc::now(),
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.lock().users.iter().rev().cloned().collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.lock();
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Ok(false);
        }
        state.submissions.retain(|s| s.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>> {
        Ok(self.lock().products.iter().find(|p| p.name == name).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.lock().products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let mut state = self.lock();
        if state.products.iter().any(|p| p.sku == product.sku) {
            return Err(AppError::Conflict(format!(
                "SKU '{}' already exists",
                product.sku
            )));
        }

        let created = Product {
            id: Uuid::new_v4(),
            name: product.name,
            sku: product.sku,
            description: product.description,
            created_at: Utc::now(),
        };
        state.products.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let mut products = self.lock().products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryStore {
    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>> {
        Ok(self.lock().products.iter().find(|p| p.name == name).cloned())
    }

    async fn record_intake(&self, intake: NewIntake, photo: PhotoWrite) -> Result<IntakeOutcome> {
        let _serial = self.intake_lock.lock().await;

        let (product, product_created) = {
            let state = self.lock();
            let existing = state
                .products
                .iter()
                .find(|p| p.name == intake.product_name)
                .cloned();

            let resolved = match existing {
                Some(product) => (product, false),
                None => {
                    if state.products.iter().any(|p| p.sku == intake.sku) {
                        return Err(AppError::InvalidProduct(format!(
                            "Could not create product '{}': SKU '{}' already exists",
                            intake.product_name, intake.sku
                        )));
                    }
                    let product = Product {
                        id: Uuid::new_v4(),
                        name: intake.product_name.clone(),
                        sku: intake.sku.clone(),
                        description: None,
                        created_at: Utc::now(),
                    };
                    (product, true)
                }
            };

            if !state.users.iter().any(|u| u.id == intake.user_id) {
                return Err(AppError::NotFound(format!(
                    "User '{}' not found",
                    intake.user_id
                )));
            }
            resolved
        };

        // Nothing is written until the photo is stored
        let photo_url = photo.await?;
        let mut state = self.lock();

        let submission = Submission {
            id: Uuid::new_v4(),
            user_id: intake.user_id,
            product_id: product.id,
            submitted_at: Utc::now(),
            status: intake.status,
            returned_quantity: RETURNED_QUANTITY,
            photo_url,
            confidence: intake.confidence,
        };

        if product_created {
            state.products.push(product.clone());
        }
        state.submissions.push(submission.clone());

        Ok(IntakeOutcome {
            submission,
            product,
            product_created,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SubmissionWithProduct>> {
        let state = self.lock();
        Ok(state
            .submissions
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| state.joined(s)))
    }

    async fn list_all(&self) -> Result<Vec<SubmissionWithProduct>> {
        Ok(self.lock().ledger(|_| true))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SubmissionWithProduct>> {
        Ok(self.lock().ledger(|s| s.user_id == user_id))
    }

    async fn update_status(&self, id: Uuid, status: SubmissionStatus) -> Result<bool> {
        match self.lock().submissions.iter_mut().find(|s| s.id == id) {
            Some(submission) => {
                submission.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Photo store that keeps locators in memory
#[derive(Default)]
pub struct RecordingPhotoStore {
    locators: Mutex<Vec<String>>,
}

impl RecordingPhotoStore {
    pub fn locators(&self) -> Vec<String> {
        self.locators.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoStore for RecordingPhotoStore {
    async fn put(&self, locator: &str, _data: Vec<u8>, _content_type: &str) -> Result<String> {
        self.locators.lock().unwrap().push(locator.to_string());
        Ok(format!("/uploads/{}", locator))
    }
}

pub struct FailingPhotoStore;

#[async_trait]
impl PhotoStore for FailingPhotoStore {
    async fn put(&self, _locator: &str, _data: Vec<u8>, _content_type: &str) -> Result<String> {
        Err(AppError::Internal("No space left on device".to_string()))
    }
}

/// Auth service with cheap Argon2 parameters and the test signing secret
pub fn test_auth_service(store: Arc<InMemoryStore>) -> AuthService {
    let config = AuthConfig::for_tests();
    AuthService::new(
        store,
        PasswordService::with_cost(1024, 1, 1).unwrap(),
        Arc::new(TokenService::new(&config)),
    )
}

pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: Uuid::new_v4(),
        email: "admin@bucle.app".to_string(),
        role: UserRole::Admin,
    }
}

pub fn create_cliente_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: Uuid::new_v4(),
        email: "cliente@bucle.app".to_string(),
        role: UserRole::Cliente,
    }
}

async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

async fn inject_cliente_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_cliente_user());
    next.run(request).await
}

pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

pub fn with_cliente_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_cliente_middleware))
}
