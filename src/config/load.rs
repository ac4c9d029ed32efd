use super::setting::Setting;
use anyhow::{bail, Context, Error};
use log::info;
use std::{fs, path::PathBuf};

pub fn load(file: &str) -> Result<Setting, Error> {
    let path = config_path(file);
    let setting = load_settings(&path)?;

    test_setting(&setting)?;

    Ok(setting)
}

fn config_path(file: &str) -> PathBuf {
    let mut path = PathBuf::from(file);
    if !path.exists() {
        info!("file not found, will try check for alternative extension");
        match path.extension().and_then(|v| v.to_str()) {
            Some("yaml") => {
                path.set_extension("yml");
            }
            Some("yml") => {
                path.set_extension("yaml");
            }
            _ => {}
        }
    }
    path
}

fn load_settings(path: &PathBuf) -> Result<Setting, Error> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read config file {:?}", path))?;
    let setting: Setting = serde_yaml::from_str(&content)?;

    Ok(setting)
}

fn test_setting(setting: &Setting) -> Result<(), Error> {
    if setting.path.trim().is_empty() {
        bail!("rule file path is empty");
    }

    if setting.poll_interval == 0 {
        bail!("poll_interval must be greater than 0");
    }

    Ok(())
}
