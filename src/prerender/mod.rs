//! Crawler-aware static responder.
//!
//! # Data Flow
//! ```text
//! Incoming request (path, User-Agent)
//!     → selector.rs (canonicalize route, allow-list gate)
//!     → signatures.rs (crawler classification)
//!     → snapshot lookup on disk
//!     → Return: Serve(document) or Fallthrough
//! ```
//!
//! # Design Decisions
//! - Selector compiled at startup (and on config reload), immutable at runtime
//! - Classification is a pure string predicate; no per-request state
//! - Deterministic: same path + User-Agent always selects the same outcome
//! - Every failure mode short of a real I/O error degrades to Fallthrough

pub mod selector;
pub mod signatures;

pub use selector::{canonical_route, Decision, Selector, StaticDocument};
pub use signatures::{Classifier, DEFAULT_SIGNATURES};
