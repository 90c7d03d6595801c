pub mod http;

pub use http::{FetchError, STORE_URL, StoreClient};
