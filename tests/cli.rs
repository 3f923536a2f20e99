use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn devto_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("devto").unwrap();
    cmd.current_dir(cwd)
        .env_remove("DEVTO_TOKEN")
        .env_remove("DEVTO_REPO")
        .env_remove("DEVTO_API_URL")
        .env_remove("RUST_LOG")
        // keep git from finding any enclosing checkout
        .env("GIT_DIR", cwd.join("no-such-git-dir"));
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.assert().success();
    String::from_utf8_lossy(&out.get_output().stdout).into_owned()
}

fn project_with_manifest() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"name": "demo", "repository": {"type": "git", "url": "git+https://github.com/sinedied/devto-cli.git"}}"#,
    )
    .unwrap();
    fs::create_dir(dir.path().join("test")).unwrap();
    dir
}

#[test]
fn stats_without_token_fails() {
    let dir = TempDir::new().unwrap();
    let out = devto_cmd(dir.path()).arg("stats").assert().code(255);

    let stderr = String::from_utf8_lossy(&out.get_output().stderr);
    assert!(stderr.contains("No dev.to API key provided."), "stderr: {stderr}");
    assert!(out.get_output().stdout.is_empty());
}

#[test]
fn stats_network_error_fails() {
    let dir = TempDir::new().unwrap();
    let out = devto_cmd(dir.path())
        .args(["stats", "--token", "k", "-n", "3"])
        .env("DEVTO_API_URL", "http://127.0.0.1:9/api")
        .assert()
        .code(255);

    let stderr = String::from_utf8_lossy(&out.get_output().stderr);
    assert!(stderr.contains("Error while showing stats"), "stderr: {stderr}");
}

#[test]
fn repo_from_flag() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(
        devto_cmd(dir.path()).args(["repo", "--repo", "https://github.com/User/Name.git"]),
    );
    assert_eq!(stdout, "User/Name\n");
}

#[test]
fn repo_from_env() {
    let dir = project_with_manifest();
    let stdout = stdout_of(devto_cmd(dir.path()).arg("repo").env("DEVTO_REPO", "user/repo"));
    assert_eq!(stdout, "user/repo\n");
}

#[test]
fn repo_from_manifest_in_parent_dir() {
    let dir = project_with_manifest();
    let stdout = stdout_of(devto_cmd(&dir.path().join("test")).arg("repo"));
    assert_eq!(stdout, "sinedied/devto-cli\n");
}

#[test]
fn repo_as_json() {
    let dir = project_with_manifest();
    let stdout = stdout_of(devto_cmd(dir.path()).args(["repo", "--json"]));
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["user"], "sinedied");
    assert_eq!(value["name"], "devto-cli");
}

#[test]
fn repo_not_found_fails() {
    let dir = project_with_manifest();
    let out = devto_cmd(&dir.path().join("test"))
        .args(["repo", "--no-parents", "--repo", "garbage"])
        .assert()
        .code(255);

    let stderr = String::from_utf8_lossy(&out.get_output().stderr);
    assert!(stderr.contains("No repository found."), "stderr: {stderr}");
}
