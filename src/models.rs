pub mod auth;
pub mod inventory;
pub mod location;
pub mod product;
