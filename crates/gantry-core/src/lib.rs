//! Core types and configuration for gantry.
//!
//! This crate defines the `gantry.toml` schema ([`GantryConfig`]), the
//! dependency manifest model ([`Manifest`]), the launch descriptor read by
//! the image's entry process ([`LaunchDescriptor`]), and shared error types.

pub mod config;
pub mod error;
pub mod launch;
pub mod manifest;

pub use config::{AppConfig, GantryConfig, ImageConfig, ServeConfig};
pub use error::{Error, Result};
pub use launch::{LaunchDescriptor, UNBUFFERED_ENV};
pub use manifest::{Constraint, ConstraintOp, DependencySpec, Manifest};
