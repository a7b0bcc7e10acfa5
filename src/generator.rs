// Package table generation for sample-packages
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashSet;

use thiserror::Error;

use crate::debug;
use crate::defaults;
use crate::helpers::MB_PER_GB;
use crate::package::{Package, RamSize, Sizing};

#[derive(Error, Debug, PartialEq)]
pub enum GenerateError {
    #[error("Invalid scale factor {0} GB: must be positive and at most {1} GB")]
    InvalidScaleFactor(f64, f64),
    #[error("Duplicate scale factor: {0} GB")]
    DuplicateScaleFactor(String),
    #[error("Invalid base package: {0}")]
    InvalidBase(String),
}

pub type Result<T> = std::result::Result<T, GenerateError>;

/// Generate the bare + kvm package pair for every scale factor, in order,
/// using the default name prefix.
pub fn generate_packages(
    base: &Package,
    scale_factors: &[RamSize],
    cpu_floor: u32,
) -> Result<Vec<Package>> {
    generate_named(defaults::NAME_PREFIX, base, scale_factors, cpu_floor)
}

/// Same as [`generate_packages`] with an explicit name prefix.
///
/// All scale factors are checked before anything is built: there is no
/// partial output.
pub fn generate_named(
    prefix: &str,
    base: &Package,
    scale_factors: &[RamSize],
    cpu_floor: u32,
) -> Result<Vec<Package>> {
    validate(base, scale_factors)?;

    let mut pkgs = Vec::with_capacity(scale_factors.len() * 2);
    for &ram in scale_factors {
        let sizing = scale(base, ram, cpu_floor);
        let bare = Package::bare(base, prefix, ram, &sizing);
        let kvm = Package::accelerated(&bare, prefix, ram);
        pkgs.push(bare);
        pkgs.push(kvm);
    }

    Ok(pkgs)
}

/// Shrink the base package linearly to `ram`.
///
/// divisor = base RAM / target RAM. cpu_cap is raised to `cpu_floor` when the
/// linear value falls below it, else rounded half away from zero. The MB
/// fields are rounded the same way.
pub fn scale(base: &Package, ram: RamSize, cpu_floor: u32) -> Sizing {
    let divisor = base.max_physical_memory as f64 / ram.mb();

    let raw_cap = base.cpu_cap as f64 / divisor;
    let cpu_cap = if raw_cap < cpu_floor as f64 {
        cpu_floor
    } else {
        raw_cap.round() as u32
    };

    debug!(
        "{} GB: divisor={} cpu_cap={} -> {}",
        ram, divisor, raw_cap, cpu_cap
    );

    // base RAM / divisor is the target RAM itself
    let quota_gb = base.quota as f64 / divisor / MB_PER_GB as f64;

    Sizing {
        cpu_cap,
        max_physical_memory: scale_mb(base.max_physical_memory, divisor),
        max_swap: scale_mb(base.max_swap, divisor),
        quota: scale_mb(base.quota, divisor),
        ram_gb: ram.gb(),
        disk_gb: quota_gb.trunc() as u64,
    }
}

fn scale_mb(value: u64, divisor: f64) -> u64 {
    (value as f64 / divisor).round() as u64
}

/// Reject anything that is not a strict or equal downscale of the base, and
/// sizes whose names would collide.
pub fn validate(base: &Package, scale_factors: &[RamSize]) -> Result<()> {
    if base.max_physical_memory == 0 {
        return Err(GenerateError::InvalidBase(format!(
            "{} has no max_physical_memory",
            base.name
        )));
    }

    let max_gb = base.ram_gb();
    let mut seen = HashSet::new();

    for ram in scale_factors {
        let gb = ram.gb();
        if !gb.is_finite() || gb <= 0.0 || ram.mb() > base.max_physical_memory as f64 {
            return Err(GenerateError::InvalidScaleFactor(gb, max_gb));
        }
        if !seen.insert(ram.to_string()) {
            return Err(GenerateError::DuplicateScaleFactor(ram.to_string()));
        }
    }

    Ok(())
}
