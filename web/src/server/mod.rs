//! Server-only code (SSR build).

pub mod api;
