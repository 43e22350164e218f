pub mod file_storage;
pub mod http;
pub mod memory;

pub use file_storage::FileStorage;
pub use http::ReqwestTransport;
pub use memory::MemoryStorage;
