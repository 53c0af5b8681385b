//! Access-control core for tapguard.
//!
//! A single master credential manages the set of authorized credentials at
//! runtime: one master scan opens an enrollment window, two scans in quick
//! succession open a removal window. Every other scan is checked against
//! the persistent [`CredentialStore`](tapguard_storage::CredentialStore).
//!
//! # Components
//!
//! - [`tap_tracker`]: double-tap detection for the master credential
//! - [`AccessController`]: the state machine, one feedback event per scan
//! - [`FeedbackEvent`]: the event vocabulary and its color/tone table
//! - [`FeedbackPresenter`]: sticky and auto-revert indicator handling
//! - [`DoorLatch`]: momentary unlock on access granted
//! - [`ControlLoop`]: the cooperative poll loop tying it all together
//!
//! Time is always passed in as milliseconds from a [`Clock`](tapguard_core::Clock),
//! so the whole core can be driven deterministically in tests.

pub mod config;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod latch;
pub mod presenter;
pub mod runtime;
pub mod state;
pub mod tap_tracker;

pub use config::{ControllerConfig, LoopConfig, PresenterConfig};
pub use controller::AccessController;
pub use error::{ControllerError, ControllerResult};
pub use feedback::{DisplayPolicy, FeedbackEvent, FeedbackIntent};
pub use latch::DoorLatch;
pub use presenter::FeedbackPresenter;
pub use runtime::ControlLoop;
pub use state::{Mode, ModeKind, StateTransition, SystemState};
pub use tap_tracker::MasterTapTracker;
