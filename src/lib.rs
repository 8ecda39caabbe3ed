//! Crawler-aware prerender gateway.
//!
//! Sits in front of a single-page application and serves pre-generated HTML
//! snapshots to search/social crawlers; every other request falls through to
//! the normal SPA response.
//!
//! ```text
//!                    ┌────────────────────────────────────────────┐
//!                    │              PRERENDER GATEWAY              │
//!   Request          │  ┌────────┐   ┌───────────┐                │
//!   ─────────────────┼─▶│  http  │──▶│ prerender │── Serve ───────┼─▶ snapshot
//!                    │  │ server │   │ selector  │                │   (cacheable)
//!                    │  └────────┘   └─────┬─────┘                │
//!                    │                     │ Fallthrough          │
//!                    │          ┌──────────┴──────────┐           │
//!                    │          ▼                     ▼           │
//!                    │   SPA build dir         dev server proxy   │
//!                    │   (production)          (development)      │
//!                    └────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod prerender;

// Cross-cutting concerns
pub mod admin;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use prerender::{Classifier, Decision, Selector};
