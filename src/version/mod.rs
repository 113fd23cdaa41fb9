//! Version tracking layer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│  Detector   │────▶│    Store    │
//! │  (fetch)    │     │  (compare)  │     │  (persist)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ Registries  │     │ Classifier  │
//! │  (github)   │     │(major/minor)│
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`classifier`]: Major/minor decision between two tags
//! - [`detector`]: Concurrent fetch and comparison against the stored baseline
//! - [`registry`]: Registry trait for looking up the latest release
//! - [`registries`]: Concrete registry implementations
//! - [`store`]: Version baseline storage
//! - [`error`]: Error types for registry and store operations
//! - [`types`]: Release, update event and detection result types

pub mod classifier;
pub mod detector;
pub mod error;
pub mod registries;
pub mod registry;
pub mod store;
pub mod types;
