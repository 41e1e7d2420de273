use std::path::PathBuf;

use gantry_build::dockerfile::DockerfileGenerator;
use gantry_core::{GantryConfig, LaunchDescriptor, Manifest};

pub async fn eject() -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = GantryConfig::load(&project_dir)?;
    let manifest = Manifest::load(&project_dir.join(&config.app.manifest))?;
    let launch = LaunchDescriptor::from_serve(&config.serve)?;

    let generator = DockerfileGenerator::new(&config, &manifest, &launch);
    let dockerfile = generator.render();

    let path = gantry_build::eject::eject(&project_dir, &dockerfile)?;

    println!("Ejected Dockerfile to {}", path.display());
    println!("You can now edit it directly. gantry build will use this file.");
    Ok(())
}
