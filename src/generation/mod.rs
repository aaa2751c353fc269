// src/generation/mod.rs
//! Dispatch artifact generation and memoization
//!
//! Producing a proxy's dispatch machinery has a fixed per-shape cost:
//! merging interface surfaces or building the fast-accessor index for a
//! subclass-style proxy. Artifacts are therefore generated once per
//! structural shape and memoized:
//!
//! ```text
//! create_proxy(config)
//!     │
//!     ├─ ShapeKey(type, surface fingerprint, strategy)
//!     │
//!     └─ GenerationCache ── hit ──→ reuse artifact
//!                     └──── miss ─→ generate once, publish, reuse
//! ```
//!
//! Entries are never evicted; a changed shape yields a different key.

pub mod artifact;
pub mod cache;

// Re-export commonly used types
pub use artifact::{DispatchArtifact, StrategyKind};
pub use cache::{CacheStats, GenerationCache, ShapeKey};
