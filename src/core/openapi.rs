use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::products::{dtos as products_dtos, handlers as products_handlers};
use crate::features::submissions::{
    dtos as submissions_dtos, handlers as submissions_handlers, models as submissions_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::token,
        auth::handlers::get_me,
        // Users (admin)
        users_handlers::list_users,
        users_handlers::delete_user,
        // Products
        products_handlers::list_products,
        products_handlers::get_product,
        products_handlers::create_product,
        // Submissions
        submissions_handlers::submit_return,
        submissions_handlers::list_submissions,
        submissions_handlers::list_my_submissions,
        submissions_handlers::get_submission,
        submissions_handlers::update_submission_status,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::TokenFormDto,
            auth::dtos::TokenResponseDto,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::TokenResponseDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Users
            users_models::UserRole,
            users_dtos::UserResponseDto,
            users_dtos::DeleteUserResponseDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<users_dtos::DeleteUserResponseDto>,
            // Products
            products_dtos::ProductResponseDto,
            products_dtos::CreateProductDto,
            ApiResponse<products_dtos::ProductResponseDto>,
            ApiResponse<Vec<products_dtos::ProductResponseDto>>,
            // Submissions
            submissions_models::SubmissionStatus,
            submissions_dtos::SubmitReturnForm,
            submissions_dtos::SubmissionResultDto,
            submissions_dtos::SubmissionResponseDto,
            submissions_dtos::UpdateStatusDto,
            submissions_dtos::StatusUpdatedDto,
            ApiResponse<submissions_dtos::SubmissionResultDto>,
            ApiResponse<submissions_dtos::SubmissionResponseDto>,
            ApiResponse<Vec<submissions_dtos::SubmissionResponseDto>>,
            ApiResponse<submissions_dtos::StatusUpdatedDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token verification"),
        (name = "users", description = "User administration (admin only)"),
        (name = "products", description = "Product catalog"),
        (name = "submissions", description = "Return intake and submission ledger"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "CircularApp API",
        version = "0.1.0",
        description = "Reverse-logistics backend: return intake, catalog and review ledger",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
