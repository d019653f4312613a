//! `marquee-actions` — named, ordered scripts of playback steps.
//!
//! # Overview
//!
//! An action is a named sequence of steps loaded from a JSON table
//! (`script.json`): each record is a single-key object whose key names the
//! operation. Records decode once at load time into the closed
//! [`ActionStep`] enum; the interpreter ([`ActionRunner`]) never re-inspects
//! raw JSON. Chains run as independent tasks with their own step cursor and
//! wait timer, and every side effect is marshalled back to the engine actor
//! as an [`ActionEffect`].
//!
//! # Step operations
//!
//! | Key (case-insensitive) | Behaviour                                      |
//! |------------------------|------------------------------------------------|
//! | `PLAY`                 | Enqueue the file                               |
//! | `PLAY-RANDOM`          | Enqueue with `[a..b]` tokens resolved, or one of several `\|`-separated choices |
//! | `WAIT`                 | Suspend the chain (value in minutes)           |
//! | `TOAST-MESSAGE`        | Surface a toast                                |
//!
//! Anything else decodes to a malformed marker that the interpreter logs
//! and skips; a bad step never aborts its chain.

pub mod debounce;
pub mod error;
pub mod runner;
pub mod step;
pub mod table;

pub use debounce::TriggerDebounce;
pub use error::{ActionError, Result};
pub use runner::{ActionEffect, ActionRunner};
pub use step::ActionStep;
pub use table::ActionTable;
