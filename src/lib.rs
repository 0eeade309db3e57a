//! Headless admin console for the kiosk content backend.
//!
//! The console keeps an in-memory document of admin sections, shows one
//! section per route, initialises each section on its first visit, refreshes
//! it from the backend on every visit, and persists drag-and-drop reordering
//! of buttons and button groups.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub(crate) mod util;
