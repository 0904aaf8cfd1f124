use assert_cmd::Command;
use std::path::Path;

pub fn run_bitgraph_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bitgraph").expect("Failed to find bitgraph binary");
    cmd.env("RUST_LOG", "warn");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
