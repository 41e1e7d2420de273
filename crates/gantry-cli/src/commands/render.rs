use std::path::PathBuf;

use gantry_build::dockerfile::DockerfileGenerator;
use gantry_build::eject as eject_mod;
use gantry_core::{GantryConfig, LaunchDescriptor, Manifest};

/// Print the Dockerfile the build pipeline would use.
pub async fn render() -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");

    if let Some(content) = eject_mod::ejected_dockerfile(&project_dir)? {
        eprintln!("# (ejected — from .gantry/Dockerfile)");
        print!("{content}");
        return Ok(());
    }

    let config = GantryConfig::load(&project_dir)?;
    let manifest = Manifest::load(&project_dir.join(&config.app.manifest))?;
    let launch = LaunchDescriptor::from_serve(&config.serve)?;

    let generator = DockerfileGenerator::new(&config, &manifest, &launch);
    print!("{}", generator.render());

    Ok(())
}
