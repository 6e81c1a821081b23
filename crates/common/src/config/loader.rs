use crate::config::error::ConfigError;
use crate::config::MockProfile;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Read every profile out of a YAML file shaped like
///
/// ```yaml
/// test:
///   host: primary
///   shards:
///     read_only:
///       host: replica
/// ```
pub fn read_profiles(path: &Path) -> Result<HashMap<String, MockProfile>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::incorrect_path(path));
    }
    let file = fs::File::open(path)?;
    let profiles: HashMap<String, MockProfile> = serde_yaml::from_reader(file)?;
    Ok(profiles)
}

/// Read a single named profile from `path`.
pub fn read_profile(path: &Path, name: &str) -> Result<MockProfile, ConfigError> {
    read_profiles(path)?
        .remove(name)
        .ok_or_else(|| ConfigError::missing_profile(name, path))
}
