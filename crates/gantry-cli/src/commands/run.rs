use std::path::PathBuf;

use gantry_core::{GantryConfig, LaunchDescriptor};
use gantry_docker::DockerClient;

/// Start a container from the built image with the launch contract's port
/// published. Blocks until the server process exits.
pub async fn run(tag: Option<String>) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let client = DockerClient::new();

    let config = GantryConfig::load(&project_dir)?;
    let launch = LaunchDescriptor::from_serve(&config.serve)?;
    let tag = tag.unwrap_or_else(|| super::default_image_tag(&project_dir));

    if !client.image_exists(&tag).await {
        anyhow::bail!("image {tag} not found — build it first with `gantry build`");
    }

    println!("Serving {tag} on {}:{}", launch.host, launch.port);
    client.run(&tag, &launch).await?;

    Ok(())
}
