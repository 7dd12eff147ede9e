// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Compute device selection.

/// Device id that conventionally selects the CPU.
pub const CPU_DEVICE_ID: i32 = -1;

/// The kind of device a backend executes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Host CPU.
    Cpu,
    /// Discrete GPU.
    Gpu,
    /// Vendor-specific accelerator card.
    Accelerator,
}

impl DeviceKind {
    /// Returns a human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceKind::Cpu => "cpu",
            DeviceKind::Gpu => "gpu",
            DeviceKind::Accelerator => "accelerator",
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete device: the CPU, or an indexed GPU / accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum DeviceSelector {
    Cpu,
    Gpu(u32),
    Accelerator(u32),
}

impl DeviceSelector {
    /// Builds a selector for an accelerated device kind.
    ///
    /// `DeviceKind::Cpu` ignores the index.
    pub fn new(kind: DeviceKind, index: u32) -> Self {
        match kind {
            DeviceKind::Cpu => DeviceSelector::Cpu,
            DeviceKind::Gpu => DeviceSelector::Gpu(index),
            DeviceKind::Accelerator => DeviceSelector::Accelerator(index),
        }
    }

    /// The kind of device selected.
    pub fn kind(self) -> DeviceKind {
        match self {
            DeviceSelector::Cpu => DeviceKind::Cpu,
            DeviceSelector::Gpu(_) => DeviceKind::Gpu,
            DeviceSelector::Accelerator(_) => DeviceKind::Accelerator,
        }
    }

    /// Device index, `None` for the CPU.
    pub fn index(self) -> Option<u32> {
        match self {
            DeviceSelector::Cpu => None,
            DeviceSelector::Gpu(i) | DeviceSelector::Accelerator(i) => Some(i),
        }
    }

    /// The integer device id this selector was built from (`-1` for the CPU).
    pub fn device_id(self) -> i32 {
        self.index()
            .map_or(CPU_DEVICE_ID, |i| i32::try_from(i).unwrap_or(i32::MAX))
    }

    pub fn is_cpu(self) -> bool {
        matches!(self, DeviceSelector::Cpu)
    }
}

impl std::fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.index() {
            None => f.write_str("cpu"),
            Some(i) => write!(f, "{}:{i}", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_roundtrip() {
        assert_eq!(DeviceSelector::Cpu.device_id(), -1);
        assert_eq!(DeviceSelector::Gpu(3).device_id(), 3);
        assert_eq!(DeviceSelector::Accelerator(0).device_id(), 0);
    }

    #[test]
    fn test_new_and_kind() {
        assert_eq!(DeviceSelector::new(DeviceKind::Gpu, 1), DeviceSelector::Gpu(1));
        assert_eq!(DeviceSelector::new(DeviceKind::Cpu, 7), DeviceSelector::Cpu);
        assert_eq!(DeviceSelector::Accelerator(2).kind(), DeviceKind::Accelerator);
        assert!(DeviceSelector::Cpu.is_cpu());
    }

    #[test]
    fn test_display() {
        assert_eq!(DeviceSelector::Cpu.to_string(), "cpu");
        assert_eq!(DeviceSelector::Gpu(0).to_string(), "gpu:0");
        assert_eq!(DeviceSelector::Accelerator(1).to_string(), "accelerator:1");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&DeviceSelector::Gpu(2)).unwrap();
        assert_eq!(json, r#"{"kind":"gpu","index":2}"#);
        let json = serde_json::to_string(&DeviceSelector::Cpu).unwrap();
        assert_eq!(json, r#"{"kind":"cpu"}"#);
    }
}
