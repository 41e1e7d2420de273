use std::fmt;
use std::path::Path;

use gantry_core::LaunchDescriptor;

use crate::docker::DockerError;
use crate::executor::{DockerExecutor, RealExecutor};

/// Engine operations client, parameterized over the executor for testability.
pub struct DockerClient<E: DockerExecutor = RealExecutor> {
    executor: E,
}

impl DockerClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for DockerClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DockerExecutor> DockerClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Engine checks ──

    pub async fn version(&self) -> Result<String, DockerError> {
        let out = self
            .executor
            .exec(&args(["version", "--format", "{{.Client.Version}}"]))
            .await?;
        Ok(out.trim().to_owned())
    }

    pub async fn daemon_reachable(&self) -> bool {
        self.executor
            .exec(&args(["info", "--format", "{{.ServerVersion}}"]))
            .await
            .is_ok()
    }

    // ── Image build ──

    /// Build the image from an assembled context. All-or-nothing: any
    /// failure aborts with no image tagged.
    pub async fn build(&self, context_dir: &Path, tag: &str) -> Result<(), BuildError> {
        let context_str = context_dir
            .to_str()
            .ok_or_else(|| BuildError::InvalidPath(context_dir.to_path_buf()))?;

        tracing::debug!(tag, context = context_str, "starting engine build");
        self.executor
            .exec_streaming(&args(["build", "-t", tag, context_str]))
            .await
            .map_err(|e| BuildError::Build { source: e })
    }

    pub async fn image_exists(&self, tag: &str) -> bool {
        self.executor
            .exec(&args(["image", "inspect", tag, "--format", "{{.Id}}"]))
            .await
            .is_ok()
    }

    pub async fn remove_image(&self, tag: &str) -> Result<(), ImageError> {
        self.executor
            .exec(&args(["image", "rm", tag]))
            .await
            .map_err(|e| ImageError::Remove {
                tag: tag.to_owned(),
                source: e,
            })?;

        Ok(())
    }

    /// Read back the launch argv baked into an image, for contract
    /// verification against the descriptor.
    pub async fn inspect_cmd(&self, tag: &str) -> Result<Vec<String>, ImageError> {
        let out = self
            .executor
            .exec(&args([
                "image",
                "inspect",
                tag,
                "--format",
                "{{json .Config.Cmd}}",
            ]))
            .await
            .map_err(|e| ImageError::Inspect {
                tag: tag.to_owned(),
                source: e,
            })?;

        serde_json::from_str(out.trim()).map_err(|e| ImageError::CmdParse {
            tag: tag.to_owned(),
            source: e,
        })
    }

    /// Compare the image's baked-in CMD against the declared launch
    /// descriptor. A mismatch means the image would not start the server
    /// process the project declares.
    pub async fn verify_launch_contract(
        &self,
        tag: &str,
        launch: &LaunchDescriptor,
    ) -> Result<(), ImageError> {
        let actual = self.inspect_cmd(tag).await?;
        let expected = launch.argv();

        if actual == expected {
            Ok(())
        } else {
            Err(ImageError::ContractMismatch {
                tag: tag.to_owned(),
                expected,
                actual,
            })
        }
    }

    // ── Container launch ──

    /// Start a container from the built image, publishing the descriptor's
    /// port on the same host port. Streams until the process exits.
    pub async fn run(&self, tag: &str, launch: &LaunchDescriptor) -> Result<(), RunError> {
        let publish = format!("{port}:{port}", port = launch.port);
        self.executor
            .exec_streaming(&args(["run", "--rm", "-p", &publish, tag]))
            .await
            .map_err(|e| RunError::Run { source: e })
    }

    // ── Doctor ──

    /// Engine-side diagnostic checks, without early return. Project-side
    /// checks (config, manifest, source) are filled in by the caller.
    pub async fn doctor(&self) -> DoctorReport {
        let mut report = DoctorReport::default();

        match self.version().await {
            Ok(v) => report.docker = CheckResult::ok(&v),
            Err(e) => {
                report.docker = CheckResult::fail(&e.to_string());
                return report;
            }
        }

        if self.daemon_reachable().await {
            report.daemon = CheckResult::ok("reachable");
        } else {
            report.daemon = CheckResult::fail("not reachable — is the docker daemon running?");
        }

        report
    }
}

// ── Helper ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

// ── Doctor types ──

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub docker: CheckResult,
    pub daemon: CheckResult,
    pub config_file: CheckResult,
    pub manifest: CheckResult,
    pub source: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.docker.passed
            && self.daemon.passed
            && self.config_file.passed
            && self.manifest.passed
            && self.source.passed
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("docker CLI", &self.docker),
            ("daemon", &self.daemon),
            ("gantry.toml", &self.config_file),
            ("manifest", &self.manifest),
            ("app source", &self.source),
        ];

        writeln!(f, "Doctor")?;
        for (label, check) in rows {
            writeln!(f, "  {label:<12} {} {}", check.icon(), check.detail)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("context path is not valid UTF-8: {0}")]
    InvalidPath(std::path::PathBuf),

    #[error("engine build failed — no image was produced")]
    Build { source: DockerError },
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to inspect image {tag}")]
    Inspect { tag: String, source: DockerError },

    #[error("unexpected inspect output for image {tag}")]
    CmdParse {
        tag: String,
        source: serde_json::Error,
    },

    #[error("failed to remove image {tag}")]
    Remove { tag: String, source: DockerError },

    #[error(
        "image {tag} launch command {actual:?} does not match the declared contract {expected:?}"
    )]
    ContractMismatch {
        tag: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("container launch failed")]
    Run { source: DockerError },
}
