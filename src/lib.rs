// sample-packages - Sample VM sizing packages
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod config;
pub mod defaults;
pub mod generator;
pub mod helpers;
pub mod output;
pub mod package;

pub use generator::{generate_packages, GenerateError};
pub use package::{Package, RamSize, Variant};
