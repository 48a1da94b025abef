use std::path::PathBuf;

const REGISTRY_FILE: &str = "PINGMON_REGISTRY";

const DEFAULT_REGISTRY_FILE: &str = "ips.txt";

pub fn get_registry_path() -> PathBuf {
    let path_from_env = std::env::var(REGISTRY_FILE);
    path_from_env.map_or(PathBuf::from(DEFAULT_REGISTRY_FILE), PathBuf::from)
}

const LOG_DIR: &str = "PINGMON_LOG_DIR";

const DEFAULT_LOG_DIR: &str = ".";

pub fn get_log_dir() -> PathBuf {
    let dir_from_env = std::env::var(LOG_DIR);
    dir_from_env.map_or(PathBuf::from(DEFAULT_LOG_DIR), PathBuf::from)
}
