// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Backend tuning options.
//!
//! [`BackendOptions`] is the loose, user-facing bag of knobs (every field has a
//! default). Resolution narrows it to the [`BackendSettings`] variant of the
//! chosen backend, validating only the options that backend reads.
//!
//! # TOML Format
//! ```toml
//! [options]
//! cpu_threads = 4
//! graph_opt_level = 1
//! workspace = "1G"
//! l3_workspace = "32M"
//! ```

use crate::ResolveError;
use backend_registry::BackendChoice;
use std::fmt;

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

/// A byte count with human-readable parsing.
///
/// # Parsing
/// - `"512M"` or `"512MB"` → 512 × 1024² bytes
/// - `"1G"` or `"1GB"` → 1 × 1024³ bytes
/// - `"64K"` or `"64KB"` → 64 × 1024 bytes
/// - `"1073741824"` or `"1073741824B"` → raw byte count
///
/// In TOML/JSON a plain integer is also accepted as a byte count.
///
/// # Examples
/// ```
/// use resolver::ByteSize;
///
/// let w = ByteSize::parse("1G").unwrap();
/// assert_eq!(w.as_bytes(), 1 << 30);
/// assert_eq!(w.to_string(), "1G");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawByteSize", into = "String")]
pub struct ByteSize {
    bytes: u64,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawByteSize {
    Bytes(u64),
    Text(String),
}

impl TryFrom<RawByteSize> for ByteSize {
    type Error = ParseByteSizeError;

    fn try_from(raw: RawByteSize) -> Result<Self, Self::Error> {
        match raw {
            RawByteSize::Bytes(bytes) => Ok(Self::from_bytes(bytes)),
            RawByteSize::Text(text) => Self::parse(&text),
        }
    }
}

impl From<ByteSize> for String {
    fn from(size: ByteSize) -> Self {
        size.to_string()
    }
}

/// Error returned by [`ByteSize::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseByteSizeError {
    #[error("empty size string")]
    Empty,

    #[error("invalid size '{0}'; expected a number followed by an optional suffix (K, M, G)")]
    Invalid(String),

    #[error("size overflow: '{0}'")]
    Overflow(String),
}

impl ByteSize {
    pub const fn from_bytes(bytes: u64) -> Self {
        Self { bytes }
    }

    pub const fn from_kb(kb: u64) -> Self {
        Self { bytes: kb * KB }
    }

    pub const fn from_mb(mb: u64) -> Self {
        Self { bytes: mb * MB }
    }

    pub const fn from_gb(gb: u64) -> Self {
        Self { bytes: gb * GB }
    }

    pub fn as_bytes(&self) -> u64 {
        self.bytes
    }

    pub fn is_zero(&self) -> bool {
        self.bytes == 0
    }

    /// Parses a human-readable size string. Case-insensitive.
    pub fn parse(s: &str) -> Result<Self, ParseByteSizeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseByteSizeError::Empty);
        }

        let upper = s.to_uppercase();
        let (num_str, multiplier) = if let Some(n) = upper.strip_suffix("GB") {
            (n, GB)
        } else if let Some(n) = upper.strip_suffix('G') {
            (n, GB)
        } else if let Some(n) = upper.strip_suffix("MB") {
            (n, MB)
        } else if let Some(n) = upper.strip_suffix('M') {
            (n, MB)
        } else if let Some(n) = upper.strip_suffix("KB") {
            (n, KB)
        } else if let Some(n) = upper.strip_suffix('K') {
            (n, KB)
        } else if let Some(n) = upper.strip_suffix('B') {
            (n, 1)
        } else {
            (upper.as_str(), 1)
        };

        let value: u64 = num_str
            .trim()
            .parse()
            .map_err(|_| ParseByteSizeError::Invalid(s.to_string()))?;

        let bytes = value
            .checked_mul(multiplier)
            .ok_or_else(|| ParseByteSizeError::Overflow(s.to_string()))?;

        Ok(Self { bytes })
    }
}

impl std::str::FromStr for ByteSize {
    type Err = ParseByteSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Renders with the largest unit that divides the size exactly.
impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.bytes;
        if b != 0 && b % GB == 0 {
            write!(f, "{}G", b / GB)
        } else if b != 0 && b % MB == 0 {
            write!(f, "{}M", b / MB)
        } else if b != 0 && b % KB == 0 {
            write!(f, "{}K", b / KB)
        } else {
            write!(f, "{b}")
        }
    }
}

/// Default tensor-compiled workspace: 2 GiB.
pub const DEFAULT_WORKSPACE: ByteSize = ByteSize::from_gb(2);

/// Default vendor accelerator L3 workspace: 64 MiB minus 4 KiB.
pub const DEFAULT_L3_WORKSPACE: ByteSize = ByteSize::from_bytes(64 * MB - 4 * KB);

/// Graph optimisation levels the generic engines accept (`-1` = engine default).
pub const GRAPH_OPT_LEVELS: [i32; 4] = [-1, 0, 1, 2];

/// User-facing tuning knobs. Fields irrelevant to the resolved backend are
/// ignored.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendOptions {
    /// Worker threads for the generic engines (engine default when unset).
    pub cpu_threads: Option<usize>,
    /// Graph optimisation level for the generic engines.
    pub graph_opt_level: i32,
    /// Scratch memory for kernel compilation (tensor-compiled).
    pub workspace: ByteSize,
    /// Largest batch the compiled engine accepts (tensor-compiled).
    pub max_batch_size: usize,
    /// On-chip L3 workspace (vendor accelerator).
    pub l3_workspace: ByteSize,
    pub adaptive_seqlen: bool,
    pub multi_stream: bool,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            cpu_threads: None,
            graph_opt_level: -1,
            workspace: DEFAULT_WORKSPACE,
            max_batch_size: 1,
            l3_workspace: DEFAULT_L3_WORKSPACE,
            adaptive_seqlen: true,
            multi_stream: true,
        }
    }
}

impl BackendOptions {
    /// Validates the options read by `backend` and narrows them to its
    /// settings variant.
    pub fn settings_for(&self, backend: BackendChoice) -> Result<BackendSettings, ResolveError> {
        match backend {
            BackendChoice::CpuGeneric | BackendChoice::AcceleratedGeneric => {
                if let Some(0) = self.cpu_threads {
                    return Err(invalid("cpu_threads", 0, "must be greater than 0"));
                }
                if !GRAPH_OPT_LEVELS.contains(&self.graph_opt_level) {
                    return Err(invalid(
                        "graph_opt_level",
                        self.graph_opt_level,
                        "expected one of -1, 0, 1, 2",
                    ));
                }
                Ok(BackendSettings::Generic {
                    cpu_threads: self.cpu_threads,
                    graph_opt_level: self.graph_opt_level,
                })
            }
            BackendChoice::TensorCompiled => {
                if self.workspace.is_zero() {
                    return Err(invalid("workspace", self.workspace, "must be non-zero"));
                }
                if self.max_batch_size == 0 {
                    return Err(invalid("max_batch_size", 0, "must be greater than 0"));
                }
                Ok(BackendSettings::TensorCompiled {
                    workspace: self.workspace,
                    max_batch_size: self.max_batch_size,
                })
            }
            BackendChoice::VendorAccelerator => {
                if self.l3_workspace.is_zero() {
                    return Err(invalid("l3_workspace", self.l3_workspace, "must be non-zero"));
                }
                Ok(BackendSettings::VendorAccelerator {
                    l3_workspace: self.l3_workspace,
                    adaptive_seqlen: self.adaptive_seqlen,
                    multi_stream: self.multi_stream,
                })
            }
        }
    }
}

fn invalid(field: &'static str, value: impl fmt::Display, reason: &str) -> ResolveError {
    ResolveError::InvalidOption {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Validated settings for exactly one backend.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BackendSettings {
    /// CPU-generic and accelerated-generic engines.
    Generic {
        cpu_threads: Option<usize>,
        graph_opt_level: i32,
    },
    TensorCompiled {
        workspace: ByteSize,
        max_batch_size: usize,
    },
    VendorAccelerator {
        l3_workspace: ByteSize,
        adaptive_seqlen: bool,
        multi_stream: bool,
    },
}

impl fmt::Display for BackendSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendSettings::Generic {
                cpu_threads,
                graph_opt_level,
            } => {
                match cpu_threads {
                    Some(n) => write!(f, "threads={n}")?,
                    None => f.write_str("threads=auto")?,
                }
                write!(f, " opt_level={graph_opt_level}")
            }
            BackendSettings::TensorCompiled {
                workspace,
                max_batch_size,
            } => write!(f, "workspace={workspace} max_batch={max_batch_size}"),
            BackendSettings::VendorAccelerator {
                l3_workspace,
                adaptive_seqlen,
                multi_stream,
            } => write!(
                f,
                "l3_workspace={l3_workspace} adaptive_seqlen={adaptive_seqlen} multi_stream={multi_stream}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(ByteSize::parse("512M").unwrap().as_bytes(), 512 * MB);
        assert_eq!(ByteSize::parse("512mb").unwrap().as_bytes(), 512 * MB);
        assert_eq!(ByteSize::parse("1G").unwrap().as_bytes(), 1 << 30);
        assert_eq!(ByteSize::parse("64KB").unwrap().as_bytes(), 64 * KB);
        assert_eq!(ByteSize::parse(" 4096 ").unwrap().as_bytes(), 4096);
        assert_eq!(ByteSize::parse("10B").unwrap().as_bytes(), 10);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(ByteSize::parse(""), Err(ParseByteSizeError::Empty));
        assert!(matches!(
            ByteSize::parse("lots"),
            Err(ParseByteSizeError::Invalid(_))
        ));
        assert!(matches!(
            ByteSize::parse("-1G"),
            Err(ParseByteSizeError::Invalid(_))
        ));
        assert!(matches!(
            ByteSize::parse("99999999999999G"),
            Err(ParseByteSizeError::Overflow(_))
        ));
    }

    #[test]
    fn test_display_picks_exact_unit() {
        assert_eq!(DEFAULT_WORKSPACE.to_string(), "2G");
        assert_eq!(DEFAULT_L3_WORKSPACE.to_string(), "65532K");
        assert_eq!(ByteSize::from_bytes(1500).to_string(), "1500");
        assert_eq!(ByteSize::from_bytes(0).to_string(), "0");
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_WORKSPACE.as_bytes(), 1 << 31);
        assert_eq!(DEFAULT_L3_WORKSPACE.as_bytes(), 64 * 1024 * 1024 - 4 * 1024);
    }

    #[test]
    fn test_options_from_toml() {
        let opts: BackendOptions = toml::from_str(
            r#"
cpu_threads = 4
workspace = "1G"
l3_workspace = 1048576
"#,
        )
        .unwrap();
        assert_eq!(opts.cpu_threads, Some(4));
        assert_eq!(opts.workspace, ByteSize::from_gb(1));
        assert_eq!(opts.l3_workspace, ByteSize::from_mb(1));
        assert_eq!(opts.graph_opt_level, -1);
        assert!(opts.multi_stream);
    }

    #[test]
    fn test_options_reject_unknown_field() {
        assert!(toml::from_str::<BackendOptions>("threads = 4").is_err());
    }

    #[test]
    fn test_settings_narrow_to_backend() {
        let opts = BackendOptions::default();
        assert_eq!(
            opts.settings_for(BackendChoice::AcceleratedGeneric).unwrap(),
            BackendSettings::Generic {
                cpu_threads: None,
                graph_opt_level: -1
            }
        );
        assert_eq!(
            opts.settings_for(BackendChoice::TensorCompiled).unwrap(),
            BackendSettings::TensorCompiled {
                workspace: DEFAULT_WORKSPACE,
                max_batch_size: 1
            }
        );
        assert!(matches!(
            opts.settings_for(BackendChoice::VendorAccelerator).unwrap(),
            BackendSettings::VendorAccelerator { .. }
        ));
    }

    #[test]
    fn test_invalid_options() {
        let opts = BackendOptions {
            cpu_threads: Some(0),
            ..Default::default()
        };
        let err = opts.settings_for(BackendChoice::CpuGeneric).unwrap_err();
        assert_eq!(err.field(), "cpu_threads");

        let opts = BackendOptions {
            graph_opt_level: 3,
            ..Default::default()
        };
        let err = opts.settings_for(BackendChoice::AcceleratedGeneric).unwrap_err();
        assert_eq!(err.field(), "graph_opt_level");
        assert_eq!(err.value(), "3");

        let opts = BackendOptions {
            workspace: ByteSize::from_bytes(0),
            ..Default::default()
        };
        let err = opts.settings_for(BackendChoice::TensorCompiled).unwrap_err();
        assert_eq!(err.field(), "workspace");
    }

    #[test]
    fn test_irrelevant_options_ignored() {
        let opts = BackendOptions {
            cpu_threads: Some(0),
            workspace: ByteSize::from_bytes(0),
            ..Default::default()
        };
        assert!(opts.settings_for(BackendChoice::VendorAccelerator).is_ok());
    }

    #[test]
    fn test_settings_serde_tag() {
        let json = serde_json::to_value(
            BackendOptions::default()
                .settings_for(BackendChoice::TensorCompiled)
                .unwrap(),
        )
        .unwrap();
        assert_eq!(json["kind"], "tensor-compiled");
        assert_eq!(json["workspace"], "2G");
    }
}
