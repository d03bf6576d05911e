/// Pool setup and startup retry
pub mod connection;

pub use connection::{MAX_CONNECTIONS, RetryPolicy, connect, connect_options};
