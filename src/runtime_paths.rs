use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;
use std::sync::{OnceLock, RwLock};

fn app_root_override_lock() -> &'static RwLock<Option<PathBuf>> {
    static OVERRIDE: OnceLock<RwLock<Option<PathBuf>>> = OnceLock::new();
    OVERRIDE.get_or_init(|| RwLock::new(None))
}

fn app_root_override() -> Option<PathBuf> {
    let lock = app_root_override_lock();
    match lock.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

#[cfg(test)]
pub(crate) fn set_app_root_override_for_tests(path: Option<PathBuf>) {
    let lock = app_root_override_lock();
    match lock.write() {
        Ok(mut guard) => *guard = path,
        Err(poisoned) => {
            let mut guard = poisoned.into_inner();
            *guard = path;
        }
    }
}

fn platform_app_root() -> PathBuf {
    if let Some(project_dirs) = ProjectDirs::from("", "", "pillcheck") {
        return project_dirs.config_dir().to_path_buf();
    }

    if let Some(base_dirs) = BaseDirs::new() {
        return base_dirs.config_local_dir().join("pillcheck");
    }

    std::env::temp_dir().join("pillcheck")
}

pub fn app_root() -> PathBuf {
    app_root_override().unwrap_or_else(platform_app_root)
}

pub fn default_config_path() -> String {
    app_root()
        .join("pillcheck.json")
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_redirects_default_config_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        set_app_root_override_for_tests(Some(dir.path().to_path_buf()));
        let path = default_config_path();
        assert!(path.starts_with(dir.path().to_str().unwrap()));
        assert!(path.ends_with("pillcheck.json"));
        set_app_root_override_for_tests(None);
    }
}
