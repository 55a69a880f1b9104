mod cache;
mod mapping;
mod token;

pub use cache::CacheError;
pub use cache::SyncCacheManager;
pub use mapping::MappingError;
pub use mapping::MappingManager;
pub use token::TokenManager;
