pub mod cache;
pub mod db;
pub mod kroger;

pub use cache::ComparisonCache;
pub use db::DbAdapter;
pub use kroger::KrogerClient;
