mod build;
mod clean;
mod doctor;
mod eject;
mod init;
mod new;
mod render;
mod run;

use std::path::Path;

pub use build::build;
pub use clean::clean;
pub use doctor::doctor;
pub use eject::eject;
pub use init::init_project;
pub use new::new_project;
pub use render::render;
pub use run::run;

/// Default gantry.toml written by `new` and `init`. Every key is optional;
/// the commented values are the defaults.
pub(crate) const GANTRY_TOML_TEMPLATE: &str = r#"[image]
# base = "python:3.11-slim"
# index_url = "https://pypi.org/simple"
# toolchain = ["build-essential"]

[app]
# source = "app.py"
# manifest = "requirements.txt"

[serve]
# host = "0.0.0.0"
# port = 8000
# entry = "app:app"
# log_level = "info"
"#;

/// Default image tag: the project directory name, sanitized, `:latest`.
pub(crate) fn default_image_tag(project_dir: &Path) -> String {
    let name = project_dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "gantry-app".to_owned());

    format!("{}:latest", sanitize_repository_name(&name))
}

/// Reduce an arbitrary directory name to a valid image repository name:
/// lowercase, `-`/`_`/`.` allowed inside, and the first character must be
/// alphanumeric, so leading separators are stripped rather than kept.
fn sanitize_repository_name(name: &str) -> String {
    let sanitized: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect();

    let trimmed = sanitized.trim_start_matches(|c: char| !c.is_ascii_alphanumeric());
    if trimmed.is_empty() {
        "gantry-app".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_repository_name;

    #[test]
    fn keeps_plain_names() {
        assert_eq!(sanitize_repository_name("my-service"), "my-service");
    }

    #[test]
    fn lowercases_and_replaces_invalid_characters() {
        assert_eq!(sanitize_repository_name("My App"), "my-app");
    }

    #[test]
    fn strips_leading_separators() {
        assert_eq!(sanitize_repository_name(".config"), "config");
        assert_eq!(sanitize_repository_name("-svc"), "svc");
        assert_eq!(sanitize_repository_name("__init"), "init");
    }

    #[test]
    fn falls_back_when_nothing_usable_remains() {
        assert_eq!(sanitize_repository_name("..."), "gantry-app");
        assert_eq!(sanitize_repository_name(""), "gantry-app");
    }
}
