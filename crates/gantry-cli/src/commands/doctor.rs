use std::path::Path;

use gantry_core::{GantryConfig, Manifest};
use gantry_docker::{CheckResult, DockerClient};

pub async fn doctor() -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    let client = DockerClient::new();

    // Engine checks
    let mut report = client.doctor().await;

    // Config file check — doctor must report diagnostics even when
    // gantry.toml is missing or invalid, so errors become failed checks.
    let config = match GantryConfig::load(project_dir) {
        Ok(config) => {
            report.config_file = if project_dir.join("gantry.toml").exists() {
                CheckResult::ok("Found")
            } else {
                CheckResult::ok("Not found (defaults in effect)")
            };
            config
        }
        Err(e) => {
            report.config_file = CheckResult::fail(&e.to_string());
            GantryConfig::default()
        }
    };

    // Manifest check
    let manifest_path = project_dir.join(&config.app.manifest);
    report.manifest = if manifest_path.exists() {
        match Manifest::load(&manifest_path) {
            Ok(m) if m.is_empty() => CheckResult::ok("empty (no dependencies declared)"),
            Ok(m) => CheckResult::ok(&format!("{} dependencies", m.len())),
            Err(e) => CheckResult::fail(&e.to_string()),
        }
    } else {
        CheckResult::fail(&format!("{} not found", config.app.manifest))
    };

    // App source check
    let source_path = project_dir.join(&config.app.source);
    report.source = if source_path.exists() {
        CheckResult::ok(&config.app.source)
    } else {
        CheckResult::fail(&format!("{} not found", config.app.source))
    };

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed — see above for details");
    }

    Ok(())
}
