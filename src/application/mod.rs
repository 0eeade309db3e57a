//! Console services: routing, lazy setup, refresh, and reordering, plus the
//! admin mutations built on top of them.

pub mod admin;
pub mod console;
pub mod error;
pub mod fetch;
pub mod lazy_init;
pub mod metrics;
pub mod ports;
pub mod registry;
pub mod reorder;
pub mod router;
pub mod sections;
