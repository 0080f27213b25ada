//! # Tagspan Core
//!
//! Inline effect-tag parsing with an incremental, order-stable tag registry.
//!
//! Text such as `Hi <wave>there</wave><!wait=2>!` is stripped of the tags
//! its registered categories accept. Every accepted tag becomes a span over
//! the clean text, ranked at its start by discovery order. The spans live
//! in per-category registries merged into one union view, follow the
//! renderer's output through index reconciliation, and feed derived caches
//! through a pull-based change journal.
//!
//! ## Features
//!
//! - **Prefix-routed categories**: `<tag>`, `<!tag>`, `<?tag>` handled by
//!   independent [`CategoryPolicy`] implementations
//! - **Stable ordering**: unique `(start, order)` keys across categories
//! - **Macros**: verbatim regions and style-sheet expansion
//! - **Reconciliation**: spans remapped through a rendered-to-clean mapping
//! - **Incremental caches**: only changed entries are rebuilt
//!
//! ## Quick Start
//!
//! ```rust
//! use tagspan_core::{TagPipeline, TagSet};
//!
//! let mut pipeline = TagPipeline::new();
//! let effects = pipeline.register(None, TagSet::new("effects").with_block("wave"))?;
//! let commands = pipeline.register(Some('!'), TagSet::new("commands").with_point("wait"))?;
//!
//! let clean = pipeline.set_text("Hi <wave>there</wave><!wait=2>!");
//! assert_eq!(clean, "Hi there!");
//!
//! let wave = &pipeline.tags(effects)[0];
//! assert_eq!((wave.span.start_index, wave.span.end_index), (3, Some(8)));
//! let wait = &pipeline.tags(commands)[0];
//! assert_eq!(wait.identity.parameters().parsed::<f32>(""), Some(Ok(2.0)));
//! # Ok::<(), tagspan_core::CoreError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(clippy::all)]
#![deny(unsafe_code)]

pub mod cache;
pub mod parser;
pub mod pipeline;
pub mod plugin;
pub mod reconcile;
pub mod registry;
pub mod tags;
pub mod tokenizer;
pub mod utils;

pub use cache::{DerivedCache, InvokableFactory};
pub use parser::{PreprocessorConfig, ProcessedText, TextPreprocessor};
pub use pipeline::TagPipeline;
pub use plugin::{CategoryPolicy, SpanClosing, TagSet};
pub use reconcile::{CharacterMapping, ReconcileReport};
pub use registry::{RegistryChange, TagRegistry, UnionRegistry};
pub use tags::{CategoryId, TagEntry, TagIdentity, TagSpan};
pub use utils::errors::Result;
pub use utils::{CoreError, PositionEncoding};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
