//! orca-state — application configuration repository for Orca.
//!
//! Reads and writes the application documents held by the trainer's
//! configuration store. Each application carries scaling bounds and four
//! sub-resource collections (install files, health checks, install
//! commands, remove commands).
//!
//! # Architecture
//!
//! ```text
//! ApplicationRepository<S: ConfigStore>
//!   ├── get / list / save / create / update_scaling
//!   └── find / upsert / delete sub-resources (via CollectionKind)
//! ConfigStore
//!   ├── TrainerClient  (HTTP, GET + POST /state/config/applications)
//!   └── MemoryStore    (in-process, for tests and local runs)
//! ```
//!
//! The trainer only accepts whole documents, so every mutation is a
//! fetch → mutate → replace cycle with last-write-wins semantics.

pub mod client;
pub mod collection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod types;

pub use client::{ConfigStore, TrainerClient};
pub use collection::CollectionKind;
pub use error::{StateError, StateResult};
pub use memory::MemoryStore;
pub use repository::ApplicationRepository;
pub use types::*;
