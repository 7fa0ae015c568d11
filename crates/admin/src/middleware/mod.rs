//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID
//! 4. Security headers
//! 5. Session layer (in-memory store, SameSite=Strict)
//! 6. Toast persistence (error toasts attached to responses)

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod toast;

pub use auth::{CurrentAdmin, RequireAdmin, SessionTokenStore, session_keys};
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use toast::{Notifier, persist_toast_middleware};
