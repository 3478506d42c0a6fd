// Pricing Engine
// Terrain profiles, the pure estimate function, its one-slot cache and summary text.
// Nothing in engine.rs performs I/O; configuration is passed in by reference.

pub mod cache;
pub mod engine;
pub mod handlers;
pub mod profiles;
pub mod summary;
