use std::path::Path;
use std::process::Command;

use gantry_build::context::{create_context, is_dirty, CONTEXT_DIR};
use gantry_build::dockerfile::DockerfileGenerator;
use gantry_build::eject::{eject, ejected_dockerfile};
use gantry_core::{GantryConfig, LaunchDescriptor, Manifest};
use tempfile::TempDir;

fn generator_parts(manifest_text: &str) -> (GantryConfig, Manifest, LaunchDescriptor) {
    (
        GantryConfig::default(),
        Manifest::parse(manifest_text).unwrap(),
        LaunchDescriptor::default(),
    )
}

fn render(manifest_text: &str) -> String {
    let (config, manifest, launch) = generator_parts(manifest_text);
    DockerfileGenerator::new(&config, &manifest, &launch).render()
}

// ── Dockerfile Generation Tests ──

#[test]
fn dockerfile_contains_stage_banners() {
    let output = render("fastapi\nuvicorn\n");

    assert!(output.contains("Stage: base provisioning"));
    assert!(output.contains("Stage: dependency resolution + toolchain pruning"));
    assert!(output.contains("Stage: application assembly + launch contract"));
}

#[test]
fn dockerfile_provisions_base_image_and_workdir() {
    let output = render("fastapi\n");

    assert!(output.starts_with("# === Stage: base provisioning ===\nFROM python:3.11-slim\n"));
    assert!(output.contains("WORKDIR /app"));
    assert!(output.contains("ENV PYTHONUNBUFFERED=1"));
}

#[test]
fn install_and_purge_share_a_single_run_layer() {
    let output = render("fastapi\nuvicorn\n");

    assert_eq!(output.matches("RUN ").count(), 1);

    let install = output.find("apt-get install -y --no-install-recommends build-essential");
    let pip = output.find("pip install --no-cache-dir -r requirements.txt");
    let purge = output.find("apt-get purge -y --auto-remove build-essential");
    let lists = output.find("rm -rf /var/lib/apt/lists/*");

    // install → resolve → purge → index cleanup, all inside the one RUN
    assert!(install.unwrap() < pip.unwrap());
    assert!(pip.unwrap() < purge.unwrap());
    assert!(purge.unwrap() < lists.unwrap());
}

#[test]
fn manifest_copy_and_install_precede_source_copy() {
    let output = render("fastapi\n");

    let manifest_copy = output.find("COPY requirements.txt ./").unwrap();
    let install = output.find("RUN ").unwrap();
    let source_copy = output.find("COPY app.py ./").unwrap();

    assert!(manifest_copy < install);
    assert!(install < source_copy);
}

#[test]
fn dockerfile_declares_exact_launch_contract() {
    let output = render("uvicorn\n");

    assert!(output.contains("EXPOSE 8000"));
    assert!(output.contains(
        r#"CMD ["uvicorn", "app:app", "--host", "0.0.0.0", "--port", "8000", "--log-level", "info"]"#
    ));
}

#[test]
fn dockerfile_uses_configured_base_image() {
    let mut config = GantryConfig::default();
    config.image.base = "python:3.12-bookworm".to_owned();
    let manifest = Manifest::parse("fastapi\n").unwrap();
    let launch = LaunchDescriptor::default();

    let output = DockerfileGenerator::new(&config, &manifest, &launch).render();
    assert!(output.contains("FROM python:3.12-bookworm"));
}

#[test]
fn dockerfile_passes_index_url_to_installer() {
    let mut config = GantryConfig::default();
    config.image.index_url = Some("https://mirror.internal/simple".to_owned());
    let manifest = Manifest::parse("fastapi\n").unwrap();
    let launch = LaunchDescriptor::default();

    let output = DockerfileGenerator::new(&config, &manifest, &launch).render();
    assert!(output.contains(
        "pip install --no-cache-dir --index-url https://mirror.internal/simple -r requirements.txt"
    ));
}

#[test]
fn empty_manifest_omits_pip_install_but_keeps_launch_contract() {
    let output = render("");

    assert!(!output.contains("pip install"));
    // Conservative policy: toolchain install/purge still happens.
    assert!(output.contains("apt-get install"));
    assert!(output.contains("apt-get purge"));
    assert!(output.contains("EXPOSE 8000"));
    assert!(output.contains("CMD ["));
}

#[test]
fn empty_toolchain_and_manifest_render_no_run_layer() {
    let mut config = GantryConfig::default();
    config.image.toolchain = Vec::new();
    let manifest = Manifest::parse("").unwrap();
    let launch = LaunchDescriptor::default();

    let output = DockerfileGenerator::new(&config, &manifest, &launch).render();
    assert!(!output.contains("RUN "));
    assert!(output.contains("COPY requirements.txt ./"));
}

#[test]
fn rendering_is_idempotent() {
    let (config, manifest, launch) = generator_parts("fastapi==0.110.0\nuvicorn\n");
    let generator = DockerfileGenerator::new(&config, &manifest, &launch);

    assert_eq!(generator.render(), generator.render());
}

#[test]
fn configured_port_flows_through_expose_and_cmd() {
    let config = GantryConfig::default();
    let manifest = Manifest::parse("uvicorn\n").unwrap();
    let launch = LaunchDescriptor {
        port: 9000,
        ..Default::default()
    };

    let output = DockerfileGenerator::new(&config, &manifest, &launch).render();
    assert!(output.contains("EXPOSE 9000"));
    assert!(output.contains(r#""--port", "9000""#));
}

// ── Context Assembly Tests ──

fn init_project(dir: &Path) {
    std::fs::write(dir.join("requirements.txt"), "fastapi\nuvicorn\n").unwrap();
    std::fs::write(dir.join("app.py"), "async def app(scope, receive, send): ...\n").unwrap();
}

#[test]
fn context_contains_manifest_source_and_dockerfile() {
    let tmp = TempDir::new().unwrap();
    init_project(tmp.path());

    let config = GantryConfig::default();
    let context = create_context(tmp.path(), &config, "FROM python:3.11-slim\n").unwrap();

    assert_eq!(context, tmp.path().join(CONTEXT_DIR));
    assert!(context.join("requirements.txt").exists());
    assert!(context.join("app.py").exists());
    assert_eq!(
        std::fs::read_to_string(context.join("Dockerfile")).unwrap(),
        "FROM python:3.11-slim\n"
    );
}

#[test]
fn context_copies_manifest_verbatim() {
    let tmp = TempDir::new().unwrap();
    init_project(tmp.path());

    let config = GantryConfig::default();
    let context = create_context(tmp.path(), &config, "FROM x\n").unwrap();

    assert_eq!(
        std::fs::read_to_string(context.join("requirements.txt")).unwrap(),
        "fastapi\nuvicorn\n"
    );
}

#[test]
fn context_cleans_previous_assembly() {
    let tmp = TempDir::new().unwrap();
    init_project(tmp.path());
    let config = GantryConfig::default();

    create_context(tmp.path(), &config, "FROM x\n").unwrap();
    let stale = tmp.path().join(CONTEXT_DIR).join("stale.txt");
    std::fs::write(&stale, "leftover").unwrap();

    create_context(tmp.path(), &config, "FROM x\n").unwrap();
    assert!(!stale.exists());
}

#[test]
fn context_copies_source_directory_excluding_git() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("requirements.txt"), "uvicorn\n").unwrap();
    let src = tmp.path().join("service");
    std::fs::create_dir_all(src.join(".git")).unwrap();
    std::fs::write(src.join("app.py"), "app = None\n").unwrap();
    std::fs::write(src.join(".git").join("HEAD"), "ref\n").unwrap();

    let mut config = GantryConfig::default();
    config.app.source = "service".to_owned();

    let context = create_context(tmp.path(), &config, "FROM x\n").unwrap();
    assert!(context.join("service/app.py").exists());
    assert!(!context.join("service/.git").exists());
}

#[test]
fn context_fails_without_manifest() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("app.py"), "app = None\n").unwrap();

    let config = GantryConfig::default();
    let err = create_context(tmp.path(), &config, "FROM x\n").unwrap_err();

    assert!(err.to_string().contains("manifest not found"));
}

#[test]
fn context_fails_without_source() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("requirements.txt"), "uvicorn\n").unwrap();

    let config = GantryConfig::default();
    let err = create_context(tmp.path(), &config, "FROM x\n").unwrap_err();

    assert!(err.to_string().contains("application source not found"));
}

// ── Dirty Check Tests ──

fn git(dir: &Path, args: &[&str]) {
    Command::new("git").args(args).current_dir(dir).output().unwrap();
}

fn init_git_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", "init"]);
}

#[test]
fn non_git_project_is_never_dirty() {
    let tmp = TempDir::new().unwrap();
    init_project(tmp.path());

    assert!(!is_dirty(tmp.path()).unwrap());
}

#[test]
fn clean_repo_is_not_dirty() {
    let tmp = TempDir::new().unwrap();
    init_project(tmp.path());
    init_git_repo(tmp.path());

    assert!(!is_dirty(tmp.path()).unwrap());
}

#[test]
fn uncommitted_changes_are_dirty() {
    let tmp = TempDir::new().unwrap();
    init_project(tmp.path());
    init_git_repo(tmp.path());
    std::fs::write(tmp.path().join("app.py"), "changed\n").unwrap();

    assert!(is_dirty(tmp.path()).unwrap());
}

// ── Eject Tests ──

#[test]
fn eject_writes_dockerfile() {
    let tmp = TempDir::new().unwrap();

    assert_eq!(ejected_dockerfile(tmp.path()).unwrap(), None);
    let path = eject(tmp.path(), "FROM python:3.11-slim\n").unwrap();

    assert_eq!(path, tmp.path().join(".gantry/Dockerfile"));
    assert_eq!(
        ejected_dockerfile(tmp.path()).unwrap().as_deref(),
        Some("FROM python:3.11-slim\n")
    );
}

#[test]
fn eject_twice_errors() {
    let tmp = TempDir::new().unwrap();
    eject(tmp.path(), "FROM x\n").unwrap();

    let err = eject(tmp.path(), "FROM y\n").unwrap_err();
    assert!(err.to_string().contains("already ejected"));
    // First eject is preserved
    assert_eq!(
        ejected_dockerfile(tmp.path()).unwrap().as_deref(),
        Some("FROM x\n")
    );
}
