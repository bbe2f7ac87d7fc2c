use std::io::Write;
use std::process::{Command, Stdio};

const ANIMATION: &str = "\
canvas 0 0 120 80
shape R rectangle
motion R 1 0 0 10 10 255 0 0  5 40 0 10 10 255 0 0
";

fn animator() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shape-animator"));
    cmd.env_remove("ANIMATOR_SPEED")
        .env_remove("ANIMATOR_VIEW")
        .env("RUST_LOG", "warn");
    cmd
}

fn write_input(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("anim.txt");
    std::fs::write(&path, ANIMATION).unwrap();
    path
}

#[test]
fn text_view_prints_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);

    let output = animator()
        .args(["--view", "text", "--in"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), ANIMATION);
}

#[test]
fn svg_view_writes_the_out_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let out = dir.path().join("anim.svg");

    let status = animator()
        .args(["-v", "svg", "-s", "2", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .status()
        .unwrap();

    assert!(status.success());
    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("viewBox=\"0 0 120 80\""));
    assert!(svg.contains("begin=\"500ms\" dur=\"2000ms\" attributeName=\"x\" from=\"0\" to=\"40\""));
}

#[test]
fn speed_can_come_from_the_environment() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);

    let output = animator()
        .env("ANIMATOR_VIEW", "svg")
        .env("ANIMATOR_SPEED", "10")
        .arg("--in")
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().contains("begin=\"100ms\""));
}

#[test]
fn visual_view_writes_a_gif() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let out = dir.path().join("anim.gif");

    let status = animator()
        .args(["--view", "visual", "--loop", "--in"])
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .status()
        .unwrap();

    assert!(status.success());
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
}

#[test]
fn edit_view_runs_commands_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let saved = dir.path().join("saved.txt");

    let mut child = animator()
        .args(["--view", "edit", "--in"])
        .arg(&input)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    {
        let mut stdin = child.stdin.take().unwrap();
        writeln!(stdin, "select R").unwrap();
        writeln!(stdin, "add-keyframe 9 40 40 10 10 0 0 255").unwrap();
        writeln!(stdin, "save {}", saved.display()).unwrap();
        writeln!(stdin, "quit").unwrap();
    }
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let saved = std::fs::read_to_string(&saved).unwrap();
    assert!(saved.contains("motion R 5 40 0 10 10 255 0 0  9 40 40 10 10 0 0 255"));
}

#[test]
fn failures_exit_non_zero_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.txt");
    std::fs::write(&input, "canvas 0 0 wide 10\n").unwrap();

    let output = animator()
        .args(["--view", "text", "--in"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to load animation"), "{}", stderr);
    assert!(stderr.contains("line 1"), "{}", stderr);
}

#[test]
fn visual_without_out_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);

    let status = animator()
        .args(["--view", "visual", "--in"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(!status.success());
}
