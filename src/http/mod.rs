//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, selector-first dispatch)
//!     → prerender selector (Serve or Fallthrough)
//!     → Fallthrough:
//!         production: SPA build dir + shell fallback
//!         development: proxy.rs forwards to the dev server
//!     → Send to client
//! ```

pub mod proxy;
pub mod request;
pub mod server;
pub mod tls;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
