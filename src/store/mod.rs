pub mod auth;
pub mod games;

pub use auth::AuthStore;
pub use games::GameStore;
