pub mod store;
pub mod store_client;

pub use store::QuestionStore;
pub use store_client::StoreClient;
