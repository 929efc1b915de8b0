use std::process::Command;

/// Short git sha of the workspace, or "unknown" outside a checkout.
fn git_sha(workspace_root: &str) -> String {
    let out = Command::new("git")
        .args(["-C", workspace_root, "rev-parse", "--short", "HEAD"])
        .output();

    match out {
        Ok(o) if o.status.success() => {
            let sha = String::from_utf8_lossy(&o.stdout).trim().to_string();
            if sha.is_empty() { "unknown".to_string() } else { sha }
        }
        _ => "unknown".to_string(),
    }
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let workspace_root = format!("{manifest_dir}/..");

    println!("cargo:rerun-if-changed={workspace_root}/.git/HEAD");
    println!("cargo:rustc-env=NUDGE_BUILD_SHA={}", git_sha(&workspace_root));
}
