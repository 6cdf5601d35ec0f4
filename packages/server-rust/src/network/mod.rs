//! Networking: configuration, middleware, handlers, and server lifecycle.

pub mod config;
pub mod endpoint;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use config::*;
pub use endpoint::CurrentRequest;
pub use handlers::AppState;
pub use middleware::BufferedBody;
pub use module::{ConnectorServices, NetworkModule};
pub use shutdown::*;
