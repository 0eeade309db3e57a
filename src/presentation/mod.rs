//! Document model and renderers for the console.

pub mod document;
pub mod outline;
pub mod render;
pub mod shell;
