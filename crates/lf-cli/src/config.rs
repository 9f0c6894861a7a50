use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lf_compiler::presets::builtin_profiles;
use lf_compiler::{GeneratorError, HeaderConfig, TargetProfile};

pub const DEFAULT_CONFIG_FILE: &str = "listforge.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub source_file: PathBuf,
    pub output_dir: PathBuf,
    pub list_prefix: String,
    pub version: String,
    pub homepage: String,
    pub expires: String,
    pub maintainer: String,
    /// Target name to on/off. Names must resolve to a profile.
    pub enabled: BTreeMap<String, bool>,
    pub generate_domain_list: bool,
    /// Overrides or additions on top of the built-in presets.
    pub profiles: BTreeMap<String, TargetProfile>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source_file: PathBuf::from("adblock.txt"),
            output_dir: PathBuf::from("lists"),
            list_prefix: "adblock".to_string(),
            version: "1.0".to_string(),
            homepage: String::new(),
            expires: "1".to_string(),
            maintainer: String::new(),
            enabled: builtin_profiles()
                .into_keys()
                .map(|name| (name, true))
                .collect(),
            generate_domain_list: true,
            profiles: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Read `path`. A missing file is a configuration error.
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        if !path.exists() {
            return Err(GeneratorError::configuration(format!(
                "config file '{}' not found",
                path.display()
            )));
        }
        let text = fs::read_to_string(path).map_err(|e| {
            GeneratorError::configuration(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Like [`GeneratorConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, GeneratorError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(text: &str) -> Result<Self, GeneratorError> {
        serde_json::from_str(text)
            .map_err(|e| GeneratorError::configuration(format!("invalid config: {e}")))
    }

    pub fn header(&self) -> HeaderConfig {
        HeaderConfig {
            version: self.version.clone(),
            homepage: self.homepage.clone(),
            expires: self.expires.clone(),
            maintainer: self.maintainer.clone(),
        }
    }

    /// Presets merged with configured profiles; configured entries win.
    pub fn resolved_profiles(&self) -> BTreeMap<String, TargetProfile> {
        let mut profiles = builtin_profiles();
        profiles.extend(self.profiles.clone());
        profiles
    }

    /// Enabled targets in name order, each paired with its profile.
    pub fn targets(&self) -> Result<Vec<(String, TargetProfile)>, GeneratorError> {
        let mut profiles = self.resolved_profiles();
        let mut targets = Vec::new();
        for (name, _) in self.enabled.iter().filter(|(_, on)| **on) {
            let profile = profiles.remove(name).ok_or_else(|| {
                GeneratorError::configuration(format!("no profile for enabled target '{name}'"))
            })?;
            targets.push((name.clone(), profile));
        }
        Ok(targets)
    }

    /// Enable exactly the named targets, even ones the file turned off.
    pub fn restrict_to(&mut self, only: &[String]) {
        if only.is_empty() {
            return;
        }
        for (name, on) in self.enabled.iter_mut() {
            *on = only.contains(name);
        }
        for name in only {
            self.enabled.insert(name.clone(), true);
        }
    }

    pub fn output_path(&self, target: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}-{target}.txt", self.list_prefix))
    }

    pub fn domain_list_path(&self) -> PathBuf {
        self.output_dir.join("domains.txt")
    }

    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.source_file.as_os_str().is_empty() {
            return Err(GeneratorError::configuration("source_file is required"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(GeneratorError::configuration("output_dir is required"));
        }
        self.header().validate()?;

        let targets = self.targets()?;
        if targets.is_empty() && !self.generate_domain_list {
            return Err(GeneratorError::configuration("no outputs enabled"));
        }
        for (name, profile) in &targets {
            profile.validate().map_err(|e| {
                GeneratorError::configuration(format!("profile '{name}': {e}"))
            })?;
        }
        Ok(())
    }
}
