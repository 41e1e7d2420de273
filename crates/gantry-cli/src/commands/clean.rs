use std::path::PathBuf;

use gantry_build::context::CONTEXT_DIR;
use gantry_docker::DockerClient;

/// Remove the assembled build context, and with `--image` the built image.
pub async fn clean(image: bool, tag: Option<String>) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let mut removed = Vec::new();

    let context_dir = project_dir.join(CONTEXT_DIR);
    if context_dir.exists() {
        std::fs::remove_dir_all(&context_dir)?;
        removed.push(CONTEXT_DIR.to_owned());
    }

    if image {
        let client = DockerClient::new();
        let tag = tag.unwrap_or_else(|| super::default_image_tag(&project_dir));
        if client.image_exists(&tag).await {
            client.remove_image(&tag).await?;
            removed.push(tag);
        }
    }

    if removed.is_empty() {
        println!("Nothing to clean.");
    } else {
        for r in &removed {
            println!("Removed {r}");
        }
    }

    Ok(())
}
