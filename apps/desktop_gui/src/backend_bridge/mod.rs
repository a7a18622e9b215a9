//! Backend side of the desktop app: command types and the worker thread.

pub mod commands;
pub mod runtime;
