pub mod auth_handler;

pub use auth_handler::{
    __path_get_me, __path_login, __path_register, __path_token, get_me, login, register, token,
};
