//! Application service backing the root controller.

/// Greeting returned by the root route.
pub const HELLO: &str = "Hello World!";

/// Stateless service behind the root controller.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppService;

impl AppService {
    /// Creates the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Greeting served at `/`.
    #[must_use]
    pub const fn get_hello(&self) -> &'static str {
        HELLO
    }
}
