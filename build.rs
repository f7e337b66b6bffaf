
// https://doc.rust-lang.org/stable/cargo/reference/build-scripts.html
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");    // XXX: prevent re-run indead
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}",
        chrono::Local::now().format("%H:%M:%S%z %Y-%m-%d"));

    // Building from a tarball (no git, or not a work tree) is fine, just leave it unknown.
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"]).output().ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_owned()).unwrap_or_else(|| "unknown".into());
    println!("cargo:rustc-env=BUILD_GIT_HASH={hash}");

    let index = std::path::Path::new(".git").join("index");
    if index.exists() { println!("cargo:rerun-if-changed={}", index.display()); }

    Ok(())
}
