use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".expense_core";
const HOME_ENV: &str = "EXPENSE_CORE_HOME";
const LEDGER_FILE: &str = "expenses.csv";
const REPORT_FILE: &str = "expense_report_summary.csv";
const CONFIG_FILE: &str = "config.json";
const STAGING_SUFFIX: &str = "tmp";

/// Returns the application data directory, defaulting to `~/.expense_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Default location of the ledger file.
pub fn default_ledger_file() -> PathBuf {
    app_data_dir().join(LEDGER_FILE)
}

pub fn default_report_file() -> PathBuf {
    app_data_dir().join(REPORT_FILE)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling file a write is staged in before being renamed over `path`,
/// e.g. `expenses.csv` stages as `expenses.csv.tmp`.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(STAGING_SUFFIX);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_path_appends_suffix() {
        assert_eq!(
            staging_path(Path::new("/data/expenses.csv")),
            PathBuf::from("/data/expenses.csv.tmp")
        );
        assert_eq!(staging_path(Path::new("ledger")), PathBuf::from("ledger.tmp"));
    }
}
