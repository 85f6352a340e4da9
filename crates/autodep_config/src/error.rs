//! Errors raised while reading or validating `autodep.toml`.

use std::path::PathBuf;

/// A problem with the project configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the expected layout.
    #[error("invalid autodep.toml: {0}")]
    Parse(String),

    /// A referenced target name does not exist in the configuration.
    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A header or implementation suffix does not start with a dot.
    #[error("suffix '{0}' in autodep.header_suffixes must start with '.'")]
    InvalidSuffix(String),

    /// A shallow-scan pattern is not a valid regular expression.
    #[error("invalid shallow_scan pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as written.
        pattern: String,
        /// The regex compiler's message.
        message: String,
    },

    /// A uselib prefix is empty or has a leading or trailing `/`.
    #[error("uselib prefix '{0}' must be a relative path without a trailing '/'")]
    InvalidPrefix(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_the_file() {
        let err = ConfigError::Read {
            path: PathBuf::from("/p/autodep.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(format!("{err}"), "failed to read /p/autodep.toml: no such file");
    }

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("targets.wm.sources".to_string());
        assert_eq!(format!("{err}"), "missing required field: targets.wm.sources");
    }

    #[test]
    fn display_invalid_pattern() {
        let err = ConfigError::InvalidPattern {
            pattern: "^boost/(".to_string(),
            message: "unclosed group".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "invalid shallow_scan pattern '^boost/(': unclosed group"
        );
    }
}
