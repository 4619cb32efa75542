use std::path::{Path, PathBuf};

pub fn config_file_path(base_path: &Path, file_name: &str) -> PathBuf {
    base_path.join(file_name)
}

/// True only for an existing regular file
pub fn exists(path: &Path) -> bool {
    path.is_file()
}
