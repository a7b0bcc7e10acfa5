// Centralised default values for the sample package set.
// SPDX-License-Identifier: GPL-3.0-or-later
//
// The top package is the largest size we hand out. Every other package is a
// linear slice of it, so these numbers decide the whole table. Config keys
// read through `config.get("key").unwrap_or(DEFAULT)` fall back to these.

// ── Top package ──────────────────────────────────────────────────────────────

pub const TOP_NAME: &str = "sample-16-smartos";
pub const TOP_DESCRIPTION: &str = "Sample 16 GB RAM, 256 GB Disk";
pub const VERSION: &str = "1.0.0";
pub const GROUP: &str = "Sample";
pub const SCHEMA_VERSION: u32 = 1;

pub const TOP_CPU_CAP: u32 = 200;
pub const TOP_MAX_LWPS: u32 = 4000;
pub const TOP_MAX_PHYSICAL_MEMORY: u64 = 16384;
pub const TOP_MAX_SWAP: u64 = 32768;
pub const TOP_QUOTA: u64 = 262144;
pub const TOP_ZFS_IO_PRIORITY: u32 = 100;

// ── Scaling ──────────────────────────────────────────────────────────────────

/// Target RAM sizes in GB. Dividing the 16GB/2CPU/256GB top package by these
/// linear-fast-fits a Richmond-A or TL-A compute node.
pub const SCALE_FACTORS_GB: [f64; 6] = [0.25, 0.5, 1.0, 4.0, 8.0, 16.0];

/// Lower bound for cpu_cap. Small packages over-provision CPU on a busy node
/// rather than getting a uselessly small cap.
pub const CPU_CAP_FLOOR: u32 = 20;

// ── Naming ───────────────────────────────────────────────────────────────────

pub const NAME_PREFIX: &str = "sample";
pub const BARE_TAG: &str = "smartos";
pub const ACCELERATED_TAG: &str = "kvm";

/// cpu_cap points per virtual CPU on the kvm variant
pub const CPU_CAP_PER_VCPU: u32 = 100;
