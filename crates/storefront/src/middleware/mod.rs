//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID
//! 4. Security headers
//! 5. Session layer (in-memory store, SameSite=Lax)
//! 6. Toast persistence
//! 7. Rate limiting (`/auth/*` only)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod toast;

pub use auth::{CurrentUser, OptionalUser, RequireUser, SessionTokenStore, session_keys};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use toast::{Notifier, persist_toast_middleware};
