use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Where an ejected Dockerfile lives, relative to the project root.
const EJECTED_DOCKERFILE: &str = ".gantry/Dockerfile";

/// Eject the generated Dockerfile into the project directory, returning the
/// path written.
///
/// After ejecting, `gantry build` uses the ejected file instead of rendering
/// one from the layer plan. Ejected files are owned by the user; the plan's
/// ordering guarantees no longer apply to them, and re-ejecting over an
/// existing file is refused rather than silently overwriting edits.
pub fn eject(project_dir: &Path, dockerfile_content: &str) -> Result<PathBuf, EjectError> {
    let path = project_dir.join(EJECTED_DOCKERFILE);

    if path.exists() {
        return Err(EjectError::AlreadyEjected(path));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| EjectError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(&path, dockerfile_content)
        .map_err(|e| EjectError::Write { path: path.clone(), source: e })?;

    Ok(path)
}

/// The ejected Dockerfile content, or `None` when the project has not
/// ejected. Read errors other than absence are surfaced, so a present but
/// unreadable file fails the build instead of being ignored.
pub fn ejected_dockerfile(project_dir: &Path) -> Result<Option<String>, EjectError> {
    let path = project_dir.join(EJECTED_DOCKERFILE);
    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(EjectError::Read { path, source: e }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EjectError {
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Dockerfile already ejected at {0} — edit it directly or delete to re-eject")]
    AlreadyEjected(PathBuf),

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read ejected Dockerfile at {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
