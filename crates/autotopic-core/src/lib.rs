//! Interval validation, description lookup, and the write pipeline.
//!
//! A site defines description windows: closed time intervals that each carry
//! a piece of text. Events created on the site while a window is open get
//! that text as their description. This crate owns the two rules that make
//! this work and the pipeline that applies them on every write.
//!
//! # Modules
//!
//! - [`interval`] -- Closed intervals and the shared range predicate.
//! - [`store`] -- [`WindowStore`] and [`EventStore`] traits.
//! - [`memory`] -- In-memory store for tests.
//! - [`validation`] -- Ordering, length, and no-overlap checks for windows.
//! - [`resolver`] -- One-shot description lookup for new events.
//! - [`pipeline`] -- [`WritePipeline`] running the pre-save steps.
//! - [`clock`] -- [`Clock`] trait with system and fixed implementations.
//! - [`config`] -- Configuration loading from `autotopic-config.yaml`.
//! - [`defaults`] -- Window factory with configured default times.
//!
//! [`WindowStore`]: store::WindowStore
//! [`EventStore`]: store::EventStore
//! [`WritePipeline`]: pipeline::WritePipeline
//! [`Clock`]: clock::Clock

pub mod clock;
pub mod config;
pub mod defaults;
pub mod interval;
pub mod memory;
pub mod pipeline;
pub mod resolver;
pub mod store;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AutotopicConfig, ConfigError};
pub use defaults::WindowDefaults;
pub use interval::{Interval, IntervalError, RangeQuery};
pub use memory::MemoryStore;
pub use pipeline::{WriteError, WritePipeline};
pub use resolver::{Resolution, resolve_description};
pub use store::{EventStore, StoreError, WindowStore};
pub use validation::{Validation, ValidationError, validate_window};
