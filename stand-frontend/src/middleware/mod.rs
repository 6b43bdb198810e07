pub mod auth;
pub mod metrics;

pub use auth::AuthUser;
pub use metrics::metrics_middleware;
