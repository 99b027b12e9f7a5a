use std::path::{Path, PathBuf};

pub const PROFILE_DIR: [&str; 2] = [".console", "session"];

#[must_use]
pub fn profile_root(home: &Path) -> PathBuf {
    home.join(PROFILE_DIR[0]).join(PROFILE_DIR[1])
}

#[must_use]
pub fn profile_file_name() -> &'static str {
    "profile.json"
}
