// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");

    // Packagers may pin the version explicitly
    let version = if let Ok(v) = std::env::var("TOF_DEPTH_VERSION") {
        v
    } else {
        get_git_version()
    };

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

fn get_git_version() -> String {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--match", "v*"])
        .output();

    let described = match output {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        // Not a git checkout (e.g. a source tarball)
        _ => return env_version(),
    };

    let described = described.strip_prefix('v').unwrap_or(&described);

    // "0.1.0-5-gabcdef1" (commits after a tag) becomes "0.1.0-dirty-abcdef1"
    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    if parts.len() >= 3 {
        let hash = parts[0].strip_prefix('g').unwrap_or(parts[0]);
        format!("{}-dirty-{}", parts[2], hash)
    } else if described.chars().all(|c| c.is_ascii_hexdigit()) {
        // No tags yet, only a commit hash
        format!("{}-{}", env_version(), described)
    } else {
        described.to_string()
    }
}

fn env_version() -> String {
    std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".to_string())
}
