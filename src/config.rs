use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::record::ConsolidationOptions;

/// Defaults applied to every record set that does not carry its own options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub options: ConsolidationOptions,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.options.simple_merge && self.options.cds_blocking {
            bail!("invalid options: 'simpleMerge' disables blocking, 'cdsBlocking' enables it");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn valid_config_all_fields() {
        let json = r#"{
            "options": {
                "circular": true,
                "cdsBlocking": true,
                "simpleMerge": false,
                "allowDifferingLocusTags": true
            }
        }"#;
        let f = write_config(json);
        let config = Config::from_file(f.path()).unwrap();
        assert!(config.options.circular);
        assert!(config.options.cds_blocking);
        assert!(!config.options.simple_merge);
        assert!(config.options.allow_differing_locus_tags);
    }

    #[test]
    fn valid_config_optional_fields_omitted() {
        let f = write_config(r#"{ "options": { "circular": true } }"#);
        let config = Config::from_file(f.path()).unwrap();
        assert!(config.options.circular);
        assert!(!config.options.cds_blocking);

        let f = write_config("{}");
        let config = Config::from_file(f.path()).unwrap();
        assert_eq!(config.options, ConsolidationOptions::default());
    }

    #[test]
    fn contradictory_blocking_modes() {
        let f = write_config(r#"{ "options": { "simpleMerge": true, "cdsBlocking": true } }"#);
        let err = Config::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("invalid options"));
    }

    #[test]
    fn malformed_json() {
        let f = write_config(r#"{ "options": "#);
        let err = Config::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/flatgene.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
