//! The four-stage image plan.
//!
//! The pipeline is an explicit, ordered sequence of immutable layer
//! snapshots: provision → resolve → prune → assemble. Each stage takes the
//! prior snapshot by value and returns a new one, so stage ordering is
//! enforced by the type system — a plan that prunes before resolving is
//! unrepresentable through this API. Externally assembled layer sequences
//! (e.g. from tooling) go through [`ImagePlan::from_layers`], which enforces
//! the same ordering at runtime.

use gantry_core::{LaunchDescriptor, Manifest, UNBUFFERED_ENV};

/// Atomic image-definition operations contributed by the stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    From { image: String },
    Workdir { path: String },
    Env { key: String, value: String },
    CopyManifest { path: String },
    InstallToolchain { packages: Vec<String> },
    InstallDependencies {
        manifest: String,
        index_url: Option<String>,
    },
    PurgeToolchain { packages: Vec<String> },
    CopySource { source: String },
    Expose { port: u16 },
    Cmd { argv: Vec<String> },
}

/// Pipeline stages, in their one valid order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StageId {
    Provision,
    Resolve,
    Prune,
    Assemble,
}

impl StageId {
    pub fn name(self) -> &'static str {
        match self {
            Self::Provision => "provision",
            Self::Resolve => "resolve",
            Self::Prune => "prune",
            Self::Assemble => "assemble",
        }
    }
}

const STAGE_ORDER: [StageId; 4] = [
    StageId::Provision,
    StageId::Resolve,
    StageId::Prune,
    StageId::Assemble,
];

/// One immutable snapshot: the stage that produced it and the directives it
/// contributed on top of the previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub stage: StageId,
    pub directives: Vec<Directive>,
}

/// Output of the provision stage.
pub struct Provisioned {
    layers: Vec<Layer>,
}

/// Output of the resolve stage. Carries the installed toolchain so the
/// prune stage purges exactly those packages and nothing else.
pub struct Resolved {
    layers: Vec<Layer>,
    toolchain: Vec<String>,
}

/// Output of the prune stage.
pub struct Pruned {
    layers: Vec<Layer>,
}

/// The complete, validated four-layer plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlan {
    layers: Vec<Layer>,
}

impl ImagePlan {
    /// Stage 1: base provisioning — base image, working directory, and the
    /// unbuffered-output environment contract.
    pub fn provision(base: &str, workdir: &str) -> Provisioned {
        let (env_key, env_value) = UNBUFFERED_ENV;
        Provisioned {
            layers: vec![Layer {
                stage: StageId::Provision,
                directives: vec![
                    Directive::From {
                        image: base.to_owned(),
                    },
                    Directive::Workdir {
                        path: workdir.to_owned(),
                    },
                    Directive::Env {
                        key: env_key.to_owned(),
                        value: env_value.to_owned(),
                    },
                ],
            }],
        }
    }

    /// Validate an externally assembled layer sequence. Every stage must
    /// appear exactly once, in pipeline order.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, PlanError> {
        let mut seen: Vec<StageId> = Vec::new();

        for layer in &layers {
            if seen.contains(&layer.stage) {
                return Err(PlanError::DuplicateStage(layer.stage.name()));
            }
            let expected = STAGE_ORDER[seen.len()];
            if layer.stage != expected {
                return Err(PlanError::OutOfOrder {
                    expected: expected.name(),
                    found: layer.stage.name(),
                });
            }
            seen.push(layer.stage);
        }

        if seen.len() != STAGE_ORDER.len() {
            return Err(PlanError::MissingStage(STAGE_ORDER[seen.len()].name()));
        }

        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.layers.iter().flat_map(|l| l.directives.iter())
    }
}

impl Provisioned {
    /// Stage 2: dependency resolution — copy the manifest, install the
    /// native build toolchain, install every declared dependency.
    ///
    /// The toolchain install is unconditional: the manifest is not
    /// inspected for whether any dependency actually needs native
    /// compilation. An empty manifest skips the install directive but the
    /// stage still transitions forward.
    pub fn resolve(
        self,
        manifest: &Manifest,
        manifest_path: &str,
        toolchain: &[String],
        index_url: Option<&str>,
    ) -> Resolved {
        let mut directives = vec![Directive::CopyManifest {
            path: manifest_path.to_owned(),
        }];

        if !toolchain.is_empty() {
            directives.push(Directive::InstallToolchain {
                packages: toolchain.to_vec(),
            });
        }

        if !manifest.is_empty() {
            directives.push(Directive::InstallDependencies {
                manifest: manifest_path.to_owned(),
                index_url: index_url.map(str::to_owned),
            });
        }

        let mut layers = self.layers;
        layers.push(Layer {
            stage: StageId::Resolve,
            directives,
        });

        Resolved {
            layers,
            toolchain: toolchain.to_vec(),
        }
    }
}

impl Resolved {
    /// Stage 3: toolchain pruning — purge exactly the packages the resolve
    /// stage installed, plus the transient package-index metadata. The
    /// installed dependencies are untouched.
    pub fn prune(self) -> Pruned {
        let mut directives = Vec::new();
        if !self.toolchain.is_empty() {
            directives.push(Directive::PurgeToolchain {
                packages: self.toolchain,
            });
        }

        let mut layers = self.layers;
        layers.push(Layer {
            stage: StageId::Prune,
            directives,
        });

        Pruned { layers }
    }
}

impl Pruned {
    /// Stage 4: application assembly and launch contract — copy the source,
    /// declare the exposed port, and fix the launch command.
    pub fn assemble(self, source: &str, launch: &LaunchDescriptor) -> ImagePlan {
        let mut layers = self.layers;
        layers.push(Layer {
            stage: StageId::Assemble,
            directives: vec![
                Directive::CopySource {
                    source: source.to_owned(),
                },
                Directive::Expose { port: launch.port },
                Directive::Cmd {
                    argv: launch.argv(),
                },
            ],
        });

        tracing::debug!(layers = layers.len(), "image plan assembled");
        ImagePlan { layers }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("stage '{found}' cannot run before stage '{expected}' completes")]
    OutOfOrder {
        expected: &'static str,
        found: &'static str,
    },

    #[error("stage '{0}' is missing from the plan")]
    MissingStage(&'static str),

    #[error("stage '{0}' appears more than once")]
    DuplicateStage(&'static str),
}
