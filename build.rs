use std::process::Command;

// Exposes the latest git tag as GIT_TAG for the footer version label.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let tag = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok());

    if let Some(tag) = tag.as_deref().map(str::trim).filter(|tag| !tag.is_empty()) {
        println!("cargo:rustc-env=GIT_TAG={tag}");
    }
}
