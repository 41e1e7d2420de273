use std::path::Path;

/// Scaffold a new ASGI project.
pub async fn new_project(name: &str) -> anyhow::Result<()> {
    let project_dir = Path::new(name);
    if project_dir.exists() {
        anyhow::bail!("directory '{}' already exists", name);
    }

    std::fs::create_dir_all(project_dir)?;

    // app.py — a dependency-free ASGI callable, so the scaffold serves
    // as soon as uvicorn is installed
    let app_py = r#"async def app(scope, receive, send):
    assert scope["type"] == "http"
    await send(
        {
            "type": "http.response.start",
            "status": 200,
            "headers": [[b"content-type", b"text/plain"]],
        }
    )
    await send({"type": "http.response.body", "body": b"ok\n"})
"#;
    std::fs::write(project_dir.join("app.py"), app_py)?;

    // requirements.txt — uvicorn is the launch contract's server process
    std::fs::write(project_dir.join("requirements.txt"), "uvicorn>=0.30\n")?;

    // gantry.toml
    std::fs::write(project_dir.join("gantry.toml"), super::GANTRY_TOML_TEMPLATE)?;

    // .gitignore
    let gitignore = "__pycache__/\n.venv/\n.gantry-context/\n.gantry/\n";
    std::fs::write(project_dir.join(".gitignore"), gitignore)?;

    // .dockerignore — keeps local state out of user-supplied contexts
    // (ejected Dockerfiles built by hand against the project root)
    let dockerignore = ".gantry-context/\n.gantry/\n__pycache__/\n.venv/\n.git/\n";
    std::fs::write(project_dir.join(".dockerignore"), dockerignore)?;

    println!("Created project '{name}'");
    println!();
    println!("  cd {name}");
    println!("  gantry render          # inspect the generated Dockerfile");
    println!("  gantry build           # build the runtime image");
    println!("  gantry run             # serve on 0.0.0.0:8000");

    Ok(())
}
