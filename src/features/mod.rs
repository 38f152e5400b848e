pub mod auth;
pub mod products;
pub mod submissions;
pub mod users;
