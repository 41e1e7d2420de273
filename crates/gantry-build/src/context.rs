use std::path::{Path, PathBuf};
use std::process::Command;

use gantry_core::GantryConfig;

/// Directory the build context is assembled into.
pub const CONTEXT_DIR: &str = ".gantry-context";

/// Entries gantry always excludes from directory copies, regardless of
/// their content.
const CONTEXT_EXCLUDES: &[&str] = &[".gantry-context", ".gantry", ".git"];

/// Assemble the build context for the engine.
///
/// The context holds exactly what the pipeline stages consume: the manifest
/// file (stage 2), the application source (stage 4), and the Dockerfile.
/// Any previous context is removed first, so the result reflects only the
/// current project state.
pub fn create_context(
    project_dir: &Path,
    config: &GantryConfig,
    dockerfile_content: &str,
) -> Result<PathBuf, ContextError> {
    let context_dir = project_dir.join(CONTEXT_DIR);

    // Clean previous context
    if context_dir.exists() {
        std::fs::remove_dir_all(&context_dir).map_err(|e| ContextError::Cleanup {
            path: context_dir.clone(),
            source: e,
        })?;
    }
    std::fs::create_dir_all(&context_dir).map_err(|e| ContextError::Create {
        path: context_dir.clone(),
        source: e,
    })?;

    // Manifest — copied verbatim, never rewritten
    let manifest_src = project_dir.join(&config.app.manifest);
    if !manifest_src.exists() {
        return Err(ContextError::MissingManifest { path: manifest_src });
    }
    copy_into(&manifest_src, &context_dir.join(&config.app.manifest))?;

    // Application source, file or directory
    let source_src = project_dir.join(&config.app.source);
    if !source_src.exists() {
        return Err(ContextError::MissingSource { path: source_src });
    }
    copy_into(&source_src, &context_dir.join(&config.app.source))?;

    // Generated (or ejected) Dockerfile
    std::fs::write(context_dir.join("Dockerfile"), dockerfile_content).map_err(|e| {
        ContextError::WriteDockerfile {
            path: context_dir.join("Dockerfile"),
            source: e,
        }
    })?;

    tracing::debug!(context = %context_dir.display(), "build context assembled");
    Ok(context_dir)
}

fn copy_into(src: &Path, dst: &Path) -> Result<(), ContextError> {
    if src.is_dir() {
        copy_tree(src, dst)
    } else {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ContextError::Create {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::copy(src, dst).map_err(|e| ContextError::CopyFile {
            path: src.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }
}

fn copy_tree(src: &Path, dst: &Path) -> Result<(), ContextError> {
    std::fs::create_dir_all(dst).map_err(|e| ContextError::Create {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let entries = std::fs::read_dir(src).map_err(|e| ContextError::CopyFile {
        path: src.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ContextError::CopyFile {
            path: src.to_path_buf(),
            source: e,
        })?;
        let name = entry.file_name();
        if CONTEXT_EXCLUDES
            .iter()
            .any(|ex| name.to_string_lossy() == *ex)
        {
            continue;
        }
        copy_into(&entry.path(), &dst.join(&name))?;
    }

    Ok(())
}

/// Whether the project's git working tree has uncommitted changes.
/// Projects that are not git repositories are never dirty.
pub fn is_dirty(project_dir: &Path) -> Result<bool, ContextError> {
    if !project_dir.join(".git").exists() {
        return Ok(false);
    }

    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(project_dir)
        .output()
        .map_err(|e| ContextError::GitCommand {
            detail: "failed to execute git status".to_owned(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ContextError::GitFailed {
            detail: format!(
                "git status exited with {}: {}",
                output.status,
                stderr.trim()
            ),
        });
    }

    Ok(!output.stdout.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to clean up context directory {path}")]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory {path}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to copy {path}")]
    CopyFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("manifest not found at {path} — declare dependencies there or set [app].manifest")]
    MissingManifest { path: PathBuf },

    #[error("application source not found at {path} — set [app].source in gantry.toml")]
    MissingSource { path: PathBuf },

    #[error("failed to write Dockerfile at {path}")]
    WriteDockerfile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("git command failed: {detail}")]
    GitCommand {
        detail: String,
        source: std::io::Error,
    },

    #[error("git failed: {detail}")]
    GitFailed { detail: String },
}
