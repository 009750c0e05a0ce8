mod client;
mod errors;
mod query;
pub mod retry;
pub mod user_agent;
pub use self::client::{Client, ClientOptions};
pub use self::errors::FetchError;
pub use self::query::{SearchQuery, DEFAULT_SEARCH_URL};
pub use self::retry::RetryPolicy;
