//! Container engine operations for gantry.
//!
//! Wraps the `docker` CLI behind [`DockerExecutor`] so that
//! [`DockerClient`] stays testable without a daemon. The engine owns the
//! all-or-nothing build contract: a failed `docker build` produces no
//! image, never a partial one.

pub mod client;
pub mod docker;
pub mod executor;

pub use client::{BuildError, CheckResult, DockerClient, DoctorReport, ImageError, RunError};
pub use docker::DockerError;
pub use executor::{DockerExecutor, RealExecutor};
