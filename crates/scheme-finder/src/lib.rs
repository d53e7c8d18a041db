//! Core library for the scheme discovery service.
//!
//! The two stateful subsystems live here: the eligibility matcher, a pure
//! filter over an immutable scheme catalog, and the account layer (credential
//! store plus session manager) persisted in device-local key-value storage.
//! Rendering and navigation stay in the service crate, which only calls the
//! functions and routers exposed from these modules.

pub mod accounts;
pub mod alerts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
