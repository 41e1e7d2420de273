use serde::{Deserialize, Serialize};

/// gantry.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GantryConfig {
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub serve: ServeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Base runtime image; determines the language runtime version.
    #[serde(default = "default_base_image")]
    pub base: String,
    /// Working directory inside the image; base for all relative copies.
    #[serde(default = "default_workdir")]
    pub workdir: String,
    /// Package index URL; determines the resolution source. None means the
    /// installer's default index.
    #[serde(default)]
    pub index_url: Option<String>,
    /// Native build toolchain packages installed before dependency
    /// resolution and purged afterwards. Installed unconditionally — the
    /// manifest is not inspected for whether native compilation is needed.
    /// Set to `[]` only for manifests known to be pure-Python.
    #[serde(default = "default_toolchain")]
    pub toolchain: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application source: the file or directory holding the entry point.
    #[serde(default = "default_source")]
    pub source: String,
    /// Dependency manifest file, one specifier per line.
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Bind host; 0.0.0.0 accepts connections on all interfaces.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port the server process binds and the image exposes.
    #[serde(default = "default_port")]
    pub port: u16,
    /// ASGI entry point as module:symbol.
    #[serde(default = "default_entry")]
    pub entry: String,
    /// Server log verbosity.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base: default_base_image(),
            workdir: default_workdir(),
            index_url: None,
            toolchain: default_toolchain(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            manifest: default_manifest(),
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            entry: default_entry(),
            log_level: default_log_level(),
        }
    }
}

impl GantryConfig {
    /// Load from gantry.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join("gantry.toml");
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }
}

fn default_base_image() -> String {
    "python:3.11-slim".to_owned()
}

fn default_workdir() -> String {
    "/app".to_owned()
}

fn default_toolchain() -> Vec<String> {
    vec!["build-essential".to_owned()]
}

fn default_source() -> String {
    "app.py".to_owned()
}

fn default_manifest() -> String {
    "requirements.txt".to_owned()
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8000
}

fn default_entry() -> String {
    "app:app".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
