// Package records for sample-packages
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

use serde::Serialize;

use crate::defaults;
use crate::helpers::{format_decimal, format_size, mb_to_gb, MB_PER_GB};

/// One selectable VM size.
///
/// Field order is the order keys appear in the emitted JSON, which downstream
/// table tools select columns from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub active: bool,
    pub cpu_cap: u32,
    #[serde(rename = "default")]
    pub is_default: bool,
    pub max_lwps: u32,
    pub max_physical_memory: u64,
    pub max_swap: u64,
    pub quota: u64,
    pub zfs_io_priority: u32,
    pub group: String,
    pub description: String,
    pub v: u32,
    /// CPU shares. Equal to `cpu_cap` on every generated package.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fss: Option<u32>,
    /// Virtual CPUs, only on the kvm variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcpu: Option<u32>,
}

impl Package {
    /// The largest package. Only ever used as the seed for scaling.
    pub fn top() -> Self {
        Self {
            name: defaults::TOP_NAME.to_string(),
            version: defaults::VERSION.to_string(),
            active: true,
            cpu_cap: defaults::TOP_CPU_CAP,
            is_default: false,
            max_lwps: defaults::TOP_MAX_LWPS,
            max_physical_memory: defaults::TOP_MAX_PHYSICAL_MEMORY,
            max_swap: defaults::TOP_MAX_SWAP,
            quota: defaults::TOP_QUOTA,
            zfs_io_priority: defaults::TOP_ZFS_IO_PRIORITY,
            group: defaults::GROUP.to_string(),
            description: defaults::TOP_DESCRIPTION.to_string(),
            v: defaults::SCHEMA_VERSION,
            fss: None,
            vcpu: None,
        }
    }

    /// Total RAM of this package in GB
    pub fn ram_gb(&self) -> f64 {
        mb_to_gb(self.max_physical_memory)
    }

    /// Build the bare (container) package for one scaled size.
    ///
    /// Everything not covered by `sizing` is copied from `base`.
    pub fn bare(base: &Package, prefix: &str, ram: RamSize, sizing: &Sizing) -> Self {
        let description = format!(
            "{} {} GB RAM, {} GB Disk",
            base.group,
            format_size(sizing.ram_gb),
            sizing.disk_gb
        );

        Self {
            name: Variant::Bare.name(prefix, ram),
            version: base.version.clone(),
            active: base.active,
            cpu_cap: sizing.cpu_cap,
            is_default: base.is_default,
            max_lwps: base.max_lwps,
            max_physical_memory: sizing.max_physical_memory,
            max_swap: sizing.max_swap,
            quota: sizing.quota,
            zfs_io_priority: sizing.cpu_cap,
            group: base.group.clone(),
            description,
            v: base.v,
            fss: Some(sizing.cpu_cap),
            vcpu: None,
        }
    }

    /// Build the hardware-accelerated twin of a bare package: same limits,
    /// kvm name, plus a vCPU count of one per 100 cpu_cap (at least one).
    pub fn accelerated(bare: &Package, prefix: &str, ram: RamSize) -> Self {
        Self {
            name: Variant::Accelerated.name(prefix, ram),
            vcpu: Some((bare.cpu_cap / defaults::CPU_CAP_PER_VCPU).max(1)),
            ..bare.clone()
        }
    }
}

/// Scaled limits for one target RAM size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    pub cpu_cap: u32,
    pub max_physical_memory: u64,
    pub max_swap: u64,
    pub quota: u64,
    /// RAM for the description, before rounding to whole MB
    pub ram_gb: f64,
    /// Disk for the description, whole GB of the unrounded quota
    pub disk_gb: u64,
}

/// Package flavour emitted for every size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Bare,        // OS container
    Accelerated, // hardware VM, carries vcpu
}

impl Variant {
    pub fn tag(self) -> &'static str {
        match self {
            Variant::Bare => defaults::BARE_TAG,
            Variant::Accelerated => defaults::ACCELERATED_TAG,
        }
    }

    /// e.g. "sample-0.25-smartos"
    pub fn name(self, prefix: &str, ram: RamSize) -> String {
        format!("{}-{}-{}", prefix, ram, self.tag())
    }
}

/// Target RAM size in GB, the scale factor for one package pair.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct RamSize(f64);

impl RamSize {
    pub fn new(gb: f64) -> Self {
        Self(gb)
    }

    pub fn gb(self) -> f64 {
        self.0
    }

    pub fn mb(self) -> f64 {
        self.0 * MB_PER_GB as f64
    }
}

impl From<f64> for RamSize {
    fn from(gb: f64) -> Self {
        Self(gb)
    }
}

impl fmt::Display for RamSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_decimal(self.0))
    }
}

impl FromStr for RamSize {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<f64>().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_gb() -> Sizing {
        Sizing {
            cpu_cap: 20,
            max_physical_memory: 256,
            max_swap: 512,
            quota: 4096,
            ram_gb: 0.25,
            disk_gb: 4,
        }
    }

    #[test]
    fn test_top_matches_defaults() {
        let top = Package::top();
        assert_eq!(top.max_physical_memory, 16384);
        assert_eq!(top.ram_gb(), 16.0);
        assert_eq!(top.cpu_cap, 200);
        assert!(top.active);
        assert!(!top.is_default);
        assert_eq!(top.fss, None);
        assert_eq!(top.vcpu, None);
    }

    #[test]
    fn test_bare_package() {
        let top = Package::top();
        let pkg = Package::bare(&top, "sample", RamSize::new(0.25), &quarter_gb());
        assert_eq!(pkg.name, "sample-0.25-smartos");
        assert_eq!(pkg.description, "Sample 0.25 GB RAM, 4 GB Disk");
        assert_eq!(pkg.fss, Some(20));
        assert_eq!(pkg.zfs_io_priority, 20);
        assert_eq!(pkg.max_lwps, top.max_lwps);
        assert_eq!(pkg.version, top.version);
        assert_eq!(pkg.vcpu, None);
    }

    #[test]
    fn test_accelerated_package() {
        let top = Package::top();
        let ram = RamSize::new(0.25);
        let bare = Package::bare(&top, "sample", ram, &quarter_gb());
        let kvm = Package::accelerated(&bare, "sample", ram);
        assert_eq!(kvm.name, "sample-0.25-kvm");
        assert_eq!(kvm.vcpu, Some(1));
        assert_eq!(
            Package {
                name: bare.name.clone(),
                vcpu: None,
                ..kvm
            },
            bare
        );
    }

    #[test]
    fn test_vcpu_per_hundred_cap() {
        let top = Package::top();
        let ram = RamSize::new(16.0);
        let sizing = Sizing {
            cpu_cap: 200,
            max_physical_memory: 16384,
            max_swap: 32768,
            quota: 262144,
            ram_gb: 16.0,
            disk_gb: 256,
        };
        let bare = Package::bare(&top, "sample", ram, &sizing);
        assert_eq!(Package::accelerated(&bare, "sample", ram).vcpu, Some(2));
    }

    #[test]
    fn test_ram_size_display() {
        assert_eq!(RamSize::new(1.0).to_string(), "1.0");
        assert_eq!(RamSize::new(0.5).to_string(), "0.5");
        assert_eq!("16".parse::<RamSize>().unwrap().to_string(), "16.0");
        assert!("lots".parse::<RamSize>().is_err());
    }

    #[test]
    fn test_serialized_keys() {
        let top = Package::top();
        let ram = RamSize::new(4.0);
        let bare = Package::bare(
            &top,
            "sample",
            ram,
            &Sizing {
                cpu_cap: 50,
                max_physical_memory: 4096,
                max_swap: 8192,
                quota: 65536,
                ram_gb: 4.0,
                disk_gb: 64,
            },
        );
        let value = serde_json::to_value(Package::accelerated(&bare, "sample", ram)).unwrap();
        assert_eq!(value["default"], false);
        assert_eq!(value["fss"], 50);
        assert_eq!(value["vcpu"], 1);
        assert!(value.get("is_default").is_none());

        let value = serde_json::to_value(&bare).unwrap();
        assert!(value.get("vcpu").is_none());
    }
}
