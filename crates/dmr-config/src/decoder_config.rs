use serde::Deserialize;

/// Largest correlator tolerance; beyond half the pattern width any window would match something
pub const MAX_CORRELATOR_BIT_ERRORS: usize = 24;

/// Tolerance used when no `[sync]` section is given
pub const DEFAULT_SYNC_BIT_ERRORS: usize = 9;

/// How dibits are stored in a capture file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum InputFormat {
    /// One dibit per byte, value in the two low bits
    #[default]
    Bytes,
    /// ASCII digits '0'..='3', whitespace ignored
    Ascii,
}

#[derive(Debug, Clone)]
pub struct CfgSync {
    /// Hamming distance tolerated on the normal phase hypothesis
    pub max_bit_errors: usize,
}

impl Default for CfgSync {
    fn default() -> Self {
        Self {
            max_bit_errors: DEFAULT_SYNC_BIT_ERRORS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CfgInput {
    /// Capture file; the command line may override it
    pub file: Option<String>,
    pub format: InputFormat,
}

#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    /// Verbose log file, if any
    pub debug_log: Option<String>,
    pub sync: CfgSync,
    pub input: CfgInput,
}

impl DecoderConfig {
    /// Validate that all required configuration fields are properly set.
    pub fn validate(&self) -> Result<(), &str> {
        if self.sync.max_bit_errors > MAX_CORRELATOR_BIT_ERRORS {
            return Err("sync.max_bit_errors must be in range 0..=24");
        }
        if let Some(ref file) = self.input.file {
            if file.is_empty() {
                return Err("input.file must not be empty when given");
            }
        }
        if let Some(ref log) = self.debug_log {
            if log.is_empty() {
                return Err("debug_log must not be empty when given");
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = DecoderConfig::default();
        assert_eq!(cfg.sync.max_bit_errors, 9);
        assert_eq!(cfg.input.format, InputFormat::Bytes);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_tolerance_ceiling() {
        let mut cfg = DecoderConfig::default();
        cfg.sync.max_bit_errors = MAX_CORRELATOR_BIT_ERRORS;
        assert!(cfg.validate().is_ok());
        cfg.sync.max_bit_errors = MAX_CORRELATOR_BIT_ERRORS + 1;
        assert!(cfg.validate().is_err());
    }
}
