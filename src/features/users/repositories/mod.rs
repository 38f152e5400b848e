mod user_repository;

pub(crate) use user_repository::user_conflict;
pub use user_repository::{PgUserRepository, UserRepository};
