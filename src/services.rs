pub mod auth;
pub mod inventory_service;
pub mod location_service;
pub mod product_service;
