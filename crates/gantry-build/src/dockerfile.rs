use gantry_core::{GantryConfig, LaunchDescriptor, Manifest};

use crate::plan::{Directive, ImagePlan, StageId};

/// Generates the minimal-runtime Dockerfile for an ASGI service.
///
/// The resolve and prune stages are rendered as one RUN instruction, so the
/// disk consumed by the build toolchain never persists in any image layer,
/// and the manifest COPY + install RUN precede the source COPY so that
/// source-only changes hit the dependency layer cache.
pub struct DockerfileGenerator<'a> {
    config: &'a GantryConfig,
    manifest: &'a Manifest,
    launch: &'a LaunchDescriptor,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(
        config: &'a GantryConfig,
        manifest: &'a Manifest,
        launch: &'a LaunchDescriptor,
    ) -> Self {
        Self {
            config,
            manifest,
            launch,
        }
    }

    /// Build the four-stage layer plan for this configuration.
    pub fn plan(&self) -> ImagePlan {
        ImagePlan::provision(&self.config.image.base, &self.config.image.workdir)
            .resolve(
                self.manifest,
                &self.config.app.manifest,
                &self.config.image.toolchain,
                self.config.image.index_url.as_deref(),
            )
            .prune()
            .assemble(&self.config.app.source, self.launch)
    }

    pub fn render(&self) -> String {
        render_plan(&self.plan())
    }
}

/// Serialize a validated plan to Dockerfile text. Rendering is pure:
/// identical plans produce byte-identical output.
pub fn render_plan(plan: &ImagePlan) -> String {
    let mut out = String::new();
    let mut run_steps: Vec<String> = Vec::new();

    for layer in plan.layers() {
        match layer.stage {
            StageId::Provision => {
                out.push_str("# === Stage: base provisioning ===\n");
                for d in &layer.directives {
                    match d {
                        Directive::From { image } => out.push_str(&format!("FROM {image}\n")),
                        Directive::Workdir { path } => out.push_str(&format!("WORKDIR {path}\n")),
                        Directive::Env { key, value } => {
                            out.push_str(&format!("ENV {key}={value}\n"));
                        }
                        _ => {}
                    }
                }
                out.push('\n');
            }
            StageId::Resolve | StageId::Prune => {
                // Collected across both stages and flushed as a single RUN
                // once the prune layer has contributed its steps.
                for d in &layer.directives {
                    match d {
                        Directive::CopyManifest { path } => {
                            out.push_str(
                                "# === Stage: dependency resolution + toolchain pruning (single layer) ===\n",
                            );
                            out.push_str(&format!("COPY {path} ./\n"));
                        }
                        Directive::InstallToolchain { packages } => {
                            run_steps.push("apt-get update".to_owned());
                            run_steps.push(format!(
                                "apt-get install -y --no-install-recommends {}",
                                packages.join(" ")
                            ));
                        }
                        Directive::InstallDependencies {
                            manifest,
                            index_url,
                        } => {
                            let index = match index_url {
                                Some(url) => format!("--index-url {url} "),
                                None => String::new(),
                            };
                            run_steps.push(format!(
                                "pip install --no-cache-dir {index}-r {manifest}"
                            ));
                        }
                        Directive::PurgeToolchain { packages } => {
                            run_steps.push(format!(
                                "apt-get purge -y --auto-remove {}",
                                packages.join(" ")
                            ));
                            run_steps.push("rm -rf /var/lib/apt/lists/*".to_owned());
                        }
                        _ => {}
                    }
                }

                if layer.stage == StageId::Prune {
                    if !run_steps.is_empty() {
                        out.push_str(&format!("RUN {}\n", run_steps.join(" \\\n    && ")));
                    }
                    out.push('\n');
                }
            }
            StageId::Assemble => {
                out.push_str("# === Stage: application assembly + launch contract ===\n");
                for d in &layer.directives {
                    match d {
                        Directive::CopySource { source } => {
                            out.push_str(&format!("COPY {source} ./\n"));
                        }
                        Directive::Expose { port } => {
                            out.push_str(&format!("\nEXPOSE {port}\n"));
                        }
                        Directive::Cmd { argv } => {
                            let quoted: Vec<String> =
                                argv.iter().map(|a| format!("\"{a}\"")).collect();
                            out.push_str(&format!("CMD [{}]\n", quoted.join(", ")));
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    out
}
