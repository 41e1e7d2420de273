//! Layer plan construction, Dockerfile rendering, and build-context
//! assembly for gantry.
//!
//! # Build pipeline
//!
//! ```text
//! gantry build
//!   1. Dirty check ── git status --porcelain (skip with --allow-dirty)
//!   2. Plan        ── provision → resolve → prune → assemble
//!   3. Dockerfile  ── render_plan() (or .gantry/Dockerfile when ejected)
//!   4. Context     ── manifest + app source → .gantry-context/
//!   5. Engine      ── docker build .gantry-context/
//! ```
//!
//! # Layer model
//!
//! Each pipeline stage consumes the previous snapshot by value and returns
//! a new one; nothing is mutated in place. The resolve and prune stages
//! render into a single RUN instruction so the build toolchain's disk usage
//! never appears in a persisted image layer.
//!
//! # Context strategy
//!
//! The context contains exactly what the image needs: the manifest file,
//! the application source, and the Dockerfile. `.gantry-context/`,
//! `.gantry/`, and `.git/` are always excluded from directory copies.

pub mod context;
pub mod dockerfile;
pub mod eject;
pub mod plan;

pub use dockerfile::DockerfileGenerator;
pub use plan::{Directive, ImagePlan, Layer, PlanError, StageId};
