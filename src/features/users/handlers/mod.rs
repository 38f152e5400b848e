pub mod user_handler;

pub use user_handler::{__path_delete_user, __path_list_users, delete_user, list_users};
