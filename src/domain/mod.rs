//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - In-memory click event crossing the handler/worker channel
//! - [`click_worker`] - Asynchronous click persistence with bounded retries
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the tracking code via the registry
//! 2. A [`click_event::ClickEvent`] is sent to a bounded channel (non-blocking)
//! 3. [`click_worker::run_click_worker`] drains the channel
//! 4. Each event becomes one ledger row plus one atomic counter increment,
//!    written in a single database transaction

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
