use gantry_core::LaunchDescriptor;
use gantry_docker::client::{BuildError, DockerClient, ImageError};
use gantry_docker::docker::DockerError;
use gantry_docker::executor::DockerExecutor;
use mockall::mock;
use std::path::PathBuf;

mock! {
    Executor {}

    impl DockerExecutor for Executor {
        async fn exec(&self, args: &[String]) -> Result<String, DockerError>;
        async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError>;
    }
}

fn command_failed(args: &[String]) -> DockerError {
    DockerError::CommandFailed {
        args: args.to_vec(),
        stderr: "boom".to_owned(),
    }
}

// ── Build Tests ──

#[tokio::test]
async fn build_invokes_docker_build_with_tag_and_context() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|args| {
            args.first().map(String::as_str) == Some("build")
                && args.contains(&"-t".to_owned())
                && args.contains(&"svc:latest".to_owned())
                && args.last().map(String::as_str) == Some(".gantry-context")
        })
        .returning(|_| Ok(()));

    let client = DockerClient::with_executor(mock);
    client
        .build(&PathBuf::from(".gantry-context"), "svc:latest")
        .await
        .unwrap();
}

#[tokio::test]
async fn build_failure_surfaces_as_build_error() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .returning(|args| Err(command_failed(args)));

    let client = DockerClient::with_executor(mock);
    let result = client
        .build(&PathBuf::from(".gantry-context"), "svc:latest")
        .await;

    assert!(matches!(result, Err(BuildError::Build { .. })));
}

// ── Image Tests ──

#[tokio::test]
async fn image_exists_true_when_inspect_succeeds() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| {
            args.contains(&"inspect".to_owned()) && args.contains(&"svc:latest".to_owned())
        })
        .returning(|_| Ok("sha256:abc\n".to_owned()));

    let client = DockerClient::with_executor(mock);
    assert!(client.image_exists("svc:latest").await);
}

#[tokio::test]
async fn image_exists_false_when_inspect_fails() {
    let mut mock = MockExecutor::new();

    mock.expect_exec().returning(|args| Err(command_failed(args)));

    let client = DockerClient::with_executor(mock);
    assert!(!client.image_exists("svc:latest").await);
}

#[tokio::test]
async fn inspect_cmd_parses_launch_argv() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| args.contains(&"{{json .Config.Cmd}}".to_owned()))
        .returning(|_| {
            Ok(
                r#"["uvicorn","app:app","--host","0.0.0.0","--port","8000","--log-level","info"]"#
                    .to_owned(),
            )
        });

    let client = DockerClient::with_executor(mock);
    let cmd = client.inspect_cmd("svc:latest").await.unwrap();

    assert_eq!(cmd, LaunchDescriptor::default().argv());
}

#[tokio::test]
async fn inspect_cmd_rejects_unparseable_output() {
    let mut mock = MockExecutor::new();

    mock.expect_exec().returning(|_| Ok("not json\n".to_owned()));

    let client = DockerClient::with_executor(mock);
    let result = client.inspect_cmd("svc:latest").await;

    assert!(matches!(result, Err(ImageError::CmdParse { .. })));
}

#[tokio::test]
async fn verify_launch_contract_accepts_matching_cmd() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| args.contains(&"{{json .Config.Cmd}}".to_owned()))
        .returning(|_| {
            Ok(
                r#"["uvicorn","app:app","--host","0.0.0.0","--port","8000","--log-level","info"]"#
                    .to_owned(),
            )
        });

    let client = DockerClient::with_executor(mock);
    client
        .verify_launch_contract("svc:latest", &LaunchDescriptor::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn verify_launch_contract_rejects_divergent_cmd() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .returning(|_| Ok(r#"["python","server.py"]"#.to_owned()));

    let client = DockerClient::with_executor(mock);
    let err = client
        .verify_launch_contract("svc:latest", &LaunchDescriptor::default())
        .await
        .unwrap_err();

    match err {
        ImageError::ContractMismatch { expected, actual, .. } => {
            assert_eq!(expected, LaunchDescriptor::default().argv());
            assert_eq!(actual, vec!["python", "server.py"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn remove_image_invokes_image_rm() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| {
            args.first().map(String::as_str) == Some("image")
                && args.contains(&"rm".to_owned())
                && args.contains(&"svc:latest".to_owned())
        })
        .returning(|_| Ok(String::new()));

    let client = DockerClient::with_executor(mock);
    client.remove_image("svc:latest").await.unwrap();
}

// ── Run Tests ──

#[tokio::test]
async fn run_publishes_descriptor_port() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|args| {
            args.first().map(String::as_str) == Some("run")
                && args.contains(&"--rm".to_owned())
                && args.contains(&"-p".to_owned())
                && args.contains(&"8000:8000".to_owned())
        })
        .returning(|_| Ok(()));

    let client = DockerClient::with_executor(mock);
    client
        .run("svc:latest", &LaunchDescriptor::default())
        .await
        .unwrap();
}

// ── Doctor Tests ──

#[tokio::test]
async fn doctor_reports_engine_checks_passing() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| args.first().map(String::as_str) == Some("version"))
        .returning(|_| Ok("27.3.1\n".to_owned()));
    mock.expect_exec()
        .withf(|args| args.first().map(String::as_str) == Some("info"))
        .returning(|_| Ok("27.3.1\n".to_owned()));

    let client = DockerClient::with_executor(mock);
    let report = client.doctor().await;

    assert!(report.docker.passed);
    assert_eq!(report.docker.detail, "27.3.1");
    assert!(report.daemon.passed);
}

#[tokio::test]
async fn doctor_short_circuits_when_cli_missing() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| args.first().map(String::as_str) == Some("version"))
        .returning(|_| {
            Err(DockerError::NotFound {
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        });

    let client = DockerClient::with_executor(mock);
    let report = client.doctor().await;

    assert!(!report.docker.passed);
    assert!(!report.daemon.passed);
    assert!(!report.all_passed());
}
