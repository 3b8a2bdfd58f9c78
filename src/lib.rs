// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Ambient lighting effect engine for a documentation site.
//!
//! Tracks pointer position and scroll offset and drives a set of CSS
//! custom properties that simulate a moving light source: five
//! root-level properties (`--glass-light-x/-y`, their mirror
//! complements, `--glass-scroll`) plus, per tracked card element, a
//! local light position relative to that card's own box.
//!
//! # Key entry points
//!
//! - [`motion::MotionController`] - the effect engine: event handling,
//!   per-frame easing, publish
//! - [`options::MotionOptions`] - every tunable (selector, smoothing,
//!   scroll distance, clamp ranges), with TOML preset support
//! - [`host::Host`] / [`host::FrameScheduler`] - the environment seams
//! - `web` (cargo feature `web`) - the wasm-bindgen browser adapter
//!
//! # Architecture
//!
//! Event handlers only ever write *target* values; a continuously
//! rescheduled frame tick eases *current* values toward them
//! (`current += (target - current) * 0.08`) and is the sole writer of
//! published properties. The per-frame computation is a pure function
//! ([`motion::compute_frame`]) of state in, property values out, so
//! the entire engine is unit-testable with a fake host and a
//! hand-cranked scheduler. This is a cosmetic layer: there is no
//! fatal-error path, and every failure degrades to "the effect does
//! nothing this frame".

pub mod easing;
pub mod error;
pub mod host;
pub mod motion;
pub mod options;

#[cfg(feature = "web")]
pub mod web;

pub use error::MotionError;
pub use motion::{InputEvent, MotionController};
pub use options::MotionOptions;
