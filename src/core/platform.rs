use std::path::PathBuf;

/// Candidate locations for the planner binary, checked in order.
pub fn get_default_planner_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // A Fast Downward checkout pointed at by DOWNWARD_REPO, release build
    if let Ok(repo) = std::env::var("DOWNWARD_REPO") {
        let repo = PathBuf::from(repo);
        paths.push(repo.join("builds/release/bin/downward"));
        paths.push(repo.join("builds/release64/bin/downward"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join("downward/builds/release/bin/downward"));
        paths.push(home.join(".local/bin/downward"));
    }

    paths.push(PathBuf::from("/usr/local/bin/downward"));
    paths.push(PathBuf::from("/usr/bin/downward"));

    paths
}

pub fn get_os_info() -> String {
    format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}
