use std::path::PathBuf;

use gantry_build::dockerfile::DockerfileGenerator;
use gantry_build::{context, eject as eject_mod};
use gantry_core::{GantryConfig, LaunchDescriptor, Manifest};
use gantry_docker::DockerClient;

/// Execute the full build pipeline: dirty check → plan → Dockerfile →
/// context → engine build → contract verification. Any failure aborts with
/// no usable image produced.
pub async fn build(tag: Option<String>, allow_dirty: bool) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let client = DockerClient::new();

    // Dirty check: refuse to bake uncommitted changes unless --allow-dirty
    if !allow_dirty && context::is_dirty(&project_dir)? {
        anyhow::bail!(
            "uncommitted changes detected.\n\
             Commit your changes, or use `gantry build --allow-dirty` to build anyway."
        );
    }

    // Inputs: configuration, manifest, launch descriptor
    let config = GantryConfig::load(&project_dir)?;
    let manifest = Manifest::load(&project_dir.join(&config.app.manifest))?;
    let launch = LaunchDescriptor::from_serve(&config.serve)?;

    let tag = tag.unwrap_or_else(|| super::default_image_tag(&project_dir));
    tracing::debug!(%tag, dependencies = manifest.len(), "starting build pipeline");

    // Dockerfile: generated from the layer plan, or the ejected file
    let (dockerfile_content, ejected) = match eject_mod::ejected_dockerfile(&project_dir)? {
        Some(content) => {
            println!("Using ejected Dockerfile from .gantry/Dockerfile");
            (content, true)
        }
        None => {
            let generator = DockerfileGenerator::new(&config, &manifest, &launch);
            (generator.render(), false)
        }
    };

    // Assemble context
    println!("Assembling build context...");
    let context_dir = context::create_context(&project_dir, &config, &dockerfile_content)?;

    // Engine build
    println!("Building {tag}...");
    client.build(&context_dir, &tag).await?;

    // Read the launch command back out of the image. Generated plans must
    // match the descriptor exactly; ejected Dockerfiles are user-owned, so
    // a divergence there is reported but not fatal.
    match client.verify_launch_contract(&tag, &launch).await {
        Ok(()) => {}
        Err(e) if ejected => println!("Warning: {e}"),
        Err(e) => return Err(e.into()),
    }

    println!();
    println!("Built: {tag}");
    println!(
        "Launch contract: {} (port {})",
        launch.command_line(),
        launch.port
    );
    println!("Start it with: gantry run --tag {tag}");

    Ok(())
}
