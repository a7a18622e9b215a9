//! UI layer for desktop GUI: app shell and theme visuals.

pub mod app;
pub mod theme;

pub use app::{AppPaths, CipherKitApp, StartupConfig};
