//! Controller layer: UI events, clipboard handling, and command orchestration.

pub mod clipboard;
pub mod events;
pub mod orchestration;
