//! Food catalog: one row per distinct food name, nutrients fixed at creation.

pub mod repo;
mod repo_types;

pub use repo_types::{Food, NewFood};
