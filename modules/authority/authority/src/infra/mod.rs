pub mod password;
pub mod storage;
pub mod token_store;

pub use token_store::InMemoryTokenStore;
