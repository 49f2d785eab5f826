use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rustc-env=PULSER_BUILD_ID={}", get_git_commit_short());

    // cortex-m-rt looks for memory.x on the linker search path.
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    fs::write(out_dir.join("memory.x"), include_bytes!("memory.x")).expect("failed to copy memory.x");
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

fn get_git_commit() -> Option<String> {
    run_cmd("git", &["rev-parse", "HEAD"])
}

/// Short commit hash, or "unknown" when not building from a git checkout.
pub fn get_git_commit_short() -> String {
    match get_git_commit() {
        Some(long) if long.len() >= 7 => long[0..7].to_string(),
        _ => "unknown".to_string(),
    }
}

fn run_cmd(cmd: &str, args: &[&str]) -> Option<String> {
    let output = std::process::Command::new(cmd).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = std::str::from_utf8(&output.stdout).ok()?;
    Some(stdout.trim().to_string())
}
