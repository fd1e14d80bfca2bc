use std::path::PathBuf;

const APP_DIR: &str = "taiwa";

/// `$<xdg_var>/taiwa` when the variable is set, else `platform_dir/taiwa`,
/// else `home_fallback/taiwa`.
fn app_dir(xdg_var: &str, platform_dir: Option<PathBuf>, home_fallback: &str) -> PathBuf {
    std::env::var_os(xdg_var)
        .map(PathBuf::from)
        .or(platform_dir)
        .unwrap_or_else(|| PathBuf::from(home_fallback))
        .join(APP_DIR)
}

pub fn get_config_dir() -> PathBuf {
    app_dir("XDG_CONFIG_HOME", dirs::config_dir(), "~/.config")
}

/// Directory for application state such as logs and history. Created if
/// missing.
pub fn get_data_dir() -> std::io::Result<PathBuf> {
    let path = app_dir("XDG_DATA_HOME", dirs::data_local_dir(), "~/.local/share");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

pub fn get_default_config() -> &'static str {
    include_str!("../data/config.yml")
}
