//! # Trip Service API
//!
//! HTTP access to the remote trip records. Everything above this module talks
//! to the [`TripsApi`] trait so components can be exercised against fakes.

pub mod client;

pub use client::{ApiError, HttpTripsApi, TripsApi};
