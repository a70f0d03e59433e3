pub mod auth;
pub mod inventory;
pub mod locations;
pub mod products;
