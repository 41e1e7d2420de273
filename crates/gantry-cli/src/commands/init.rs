use std::path::Path;

use gantry_core::GantryConfig;

/// Initialize gantry in an existing ASGI project.
pub async fn init_project() -> anyhow::Result<()> {
    let config = GantryConfig::default();

    // Must look like an ASGI project: the default manifest or source
    // should already be there.
    let has_manifest = Path::new(&config.app.manifest).exists();
    let has_source = Path::new(&config.app.source).exists();
    if !has_manifest && !has_source {
        anyhow::bail!(
            "neither {} nor {} found. Run this command from the project root, \
             or use `gantry new` to scaffold a fresh project.",
            config.app.manifest,
            config.app.source
        );
    }

    let mut created = Vec::new();

    let config_path = Path::new("gantry.toml");
    if config_path.exists() {
        eprintln!("gantry.toml already exists, skipping");
    } else {
        std::fs::write(config_path, super::GANTRY_TOML_TEMPLATE)?;
        created.push("gantry.toml");
    }

    if !has_manifest {
        std::fs::write(&config.app.manifest, "uvicorn>=0.30\n")?;
        created.push("requirements.txt");
    }

    if created.is_empty() {
        println!("Nothing to create — already initialized.");
    } else {
        for f in &created {
            println!("Created {f}");
        }
    }

    println!();
    println!("Next steps:");
    println!();
    println!("  1. Declare dependencies in {}", config.app.manifest);
    println!("  2. Check readiness:   gantry doctor");
    println!("  3. Build the image:   gantry build");
    println!("  4. Serve it:          gantry run");

    Ok(())
}
