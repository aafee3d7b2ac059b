// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tessera integration tests.
//!
//! Provides in-memory collaborators and a harness for fast, deterministic
//! tests without touching the filesystem.
//!
//! # Components
//!
//! - [`MockManifestSource`] - In-memory manifest source with load counting
//! - [`ManifestBuilder`] - Fluent builder for manifest JSON
//! - [`MutableModules`] - Module versions that can change mid-test
//! - [`TestHarness`] - A registry wired to all of the above

pub mod builder;
pub mod harness;
pub mod mock_source;
pub mod modules;

pub use builder::ManifestBuilder;
pub use harness::TestHarness;
pub use mock_source::MockManifestSource;
pub use modules::MutableModules;
