//! # Core Application Logic
//!
//! This module contains Roadtrip's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Trip data model      │
//!                    │  • Session state        │
//!                    │  • App state + update() │
//!                    │                         │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │    API     │
//!     │  Adapter   │                          │  (reqwest) │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`trip`]: Trip, TripPlan, DayPlan and friends
//! - [`session`]: `SessionState`, the shared login status
//! - [`credentials`]: where the credential token is persisted
//! - [`route`]: screens and the `Navigator` capability
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: config file + env + CLI resolution

pub mod action;
pub mod config;
pub mod credentials;
pub mod route;
pub mod session;
pub mod state;
pub mod trip;
