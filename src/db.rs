pub mod user_repo;
pub use user_repo::UserRepository;
pub mod session_repo;
pub use session_repo::SessionRepository;
pub mod product_repo;
pub use product_repo::{ProductRecord, ProductRepository};
pub mod location_repo;
pub use location_repo::LocationRepository;
pub mod transaction_repo;
pub use transaction_repo::TransactionRepository;
