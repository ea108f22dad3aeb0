use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use super::decoder_config::{CfgInput, CfgSync, DecoderConfig, InputFormat};

/// Build `DecoderConfig` from a TOML configuration string
pub fn from_toml_str(toml_str: &str) -> Result<DecoderConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    // Various sanity checks
    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if let Some(ref sync) = root.sync {
        if !sync.extra.is_empty() {
            return Err(format!("Unrecognized fields in sync: {:?}", sorted_keys(&sync.extra)).into());
        }
    }
    if let Some(ref input) = root.input {
        if !input.extra.is_empty() {
            return Err(format!("Unrecognized fields in input: {:?}", sorted_keys(&input.extra)).into());
        }
    }

    let mut cfg = DecoderConfig {
        debug_log: root.debug_log,
        sync: CfgSync::default(),
        input: CfgInput::default(),
    };

    if let Some(sync) = root.sync {
        if let Some(v) = sync.max_bit_errors {
            cfg.sync.max_bit_errors = v;
        }
    }
    if let Some(input) = root.input {
        cfg.input.file = input.file;
        if let Some(v) = input.format {
            cfg.input.format = v;
        }
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Build `DecoderConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<DecoderConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `DecoderConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DecoderConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    from_reader(f)
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,

    #[serde(default)]
    sync: Option<SyncDto>,

    #[serde(default)]
    input: Option<InputDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct SyncDto {
    pub max_bit_errors: Option<usize>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct InputDto {
    pub file: Option<String>,
    pub format: Option<InputFormat>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let toml = r#"
            config_version = "0.1"
            debug_log = "dmr-verbose.log"

            [sync]
            max_bit_errors = 4

            [input]
            file = "capture.dibits"
            format = "Ascii"
        "#;
        let cfg = from_toml_str(toml).unwrap();
        assert_eq!(cfg.debug_log.as_deref(), Some("dmr-verbose.log"));
        assert_eq!(cfg.sync.max_bit_errors, 4);
        assert_eq!(cfg.input.file.as_deref(), Some("capture.dibits"));
        assert_eq!(cfg.input.format, InputFormat::Ascii);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let cfg = from_reader("config_version = \"0.1\"\n".as_bytes()).unwrap();
        assert!(cfg.debug_log.is_none());
        assert_eq!(cfg.sync.max_bit_errors, 9);
        assert!(cfg.input.file.is_none());
        assert_eq!(cfg.input.format, InputFormat::Bytes);
    }

    #[test]
    fn test_rejects_wrong_version() {
        let err = from_toml_str("config_version = \"0.5\"\n").unwrap_err();
        assert!(err.to_string().contains("config_version"));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = from_toml_str("config_version = \"0.1\"\nfoo = 1\n").unwrap_err();
        assert!(err.to_string().contains("foo"));

        let err = from_toml_str("config_version = \"0.1\"\n[sync]\nmax_errors = 2\n").unwrap_err();
        assert!(err.to_string().contains("max_errors"));
    }

    #[test]
    fn test_rejects_out_of_range_tolerance() {
        assert!(from_toml_str("config_version = \"0.1\"\n[sync]\nmax_bit_errors = 30\n").is_err());
    }
}
