//! Feature-flag configuration with an explicit persistence boundary.
//!
//! Each flag gates one rule group entirely. The engine never reads
//! configuration on its own: a [`FeatureFlags`] snapshot is injected into
//! every call, and persistence happens only at the host's load/save
//! boundary here. There is deliberately no process-wide mutable state.

use std::{
  fs,
  io,
  path::Path,
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
  #[error("failed to read config file")]
  Read(#[source] io::Error),
  #[error("failed to write config file")]
  Write(#[source] io::Error),
  #[error(transparent)]
  Parse(#[from] toml::de::Error),
  #[error(transparent)]
  Serialize(#[from] toml::ser::Error),
}

/// Which rule groups run. Defaults to everything enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FeatureFlags {
  pub close_brackets_and_quotes: bool,
  pub complete_xml: bool,
  pub detect_lists: bool,
  pub autoindent_after_function_or_list: bool,
}

impl Default for FeatureFlags {
  fn default() -> Self {
    Self {
      close_brackets_and_quotes: true,
      complete_xml: true,
      detect_lists: true,
      autoindent_after_function_or_list: true,
    }
  }
}

impl FeatureFlags {
  pub fn from_toml(text: &str) -> Result<Self> {
    Ok(toml::from_str(text)?)
  }

  pub fn to_toml(&self) -> Result<String> {
    Ok(toml::to_string(self)?)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let text = fs::read_to_string(path).map_err(ConfigError::Read)?;
    Self::from_toml(&text)
  }

  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, self.to_toml()?).map_err(ConfigError::Write)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn defaults_enable_everything() {
    let flags = FeatureFlags::default();
    assert!(flags.close_brackets_and_quotes);
    assert!(flags.complete_xml);
    assert!(flags.detect_lists);
    assert!(flags.autoindent_after_function_or_list);
  }

  #[test]
  fn toml_round_trip() {
    let flags = FeatureFlags {
      complete_xml: false,
      ..Default::default()
    };
    let text = flags.to_toml().unwrap();
    assert_eq!(FeatureFlags::from_toml(&text).unwrap(), flags);
  }

  #[test]
  fn missing_keys_fall_back_to_defaults() {
    let flags = FeatureFlags::from_toml("detect-lists = false\n").unwrap();
    assert!(!flags.detect_lists);
    assert!(flags.close_brackets_and_quotes);
  }

  #[test]
  fn empty_file_is_all_defaults() {
    assert_eq!(
      FeatureFlags::from_toml("").unwrap(),
      FeatureFlags::default()
    );
  }
}
