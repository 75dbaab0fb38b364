// FILE: src/cli/config.rs

use crate::error::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    pub properties: Option<String>,
    pub defines: Option<String>,
    pub gperf_executable: Option<String>,
    pub output_directory: Option<String>,
    pub skip_gperf: Option<bool>,
    pub verbose: Option<bool>,
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| GeneratorError::FileNotFound {
        path: format!("Config file {}: {}", config_path, e),
    })?;

    let config = if config_path.ends_with(".json") {
        serde_json::from_str(&config_content).map_err(|e| GeneratorError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })?
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content).map_err(|e| GeneratorError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })?
    } else {
        return Err(GeneratorError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        });
    };

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "csspropgen.toml",
            "properties = \"CSSProperties.json\"\ndefines = \"ENABLE_A ENABLE_B\"\nskip-gperf = true\n",
        );

        let config = load(&path).unwrap();
        assert_eq!(config.properties.as_deref(), Some("CSSProperties.json"));
        assert_eq!(config.defines.as_deref(), Some("ENABLE_A ENABLE_B"));
        assert_eq!(config.skip_gperf, Some(true));
        assert_eq!(config.output_directory, None);
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "csspropgen.json",
            r#"{"gperf-executable": "/usr/bin/gperf", "output-directory": "out"}"#,
        );

        let config = load(&path).unwrap();
        assert_eq!(config.gperf_executable.as_deref(), Some("/usr/bin/gperf"));
        assert_eq!(config.output_directory.as_deref(), Some("out"));
    }

    #[test]
    fn test_rejects_other_formats() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "csspropgen.yaml", "defines: A");
        assert!(matches!(load(&path), Err(GeneratorError::InvalidFormat { .. })));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            load(&missing.to_string_lossy()),
            Err(GeneratorError::FileNotFound { .. })
        ));
    }
}
