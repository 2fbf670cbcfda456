//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

#![allow(dead_code)]

/// Success - every release was checked
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Outdated releases found and `--fail-on-outdated` was given
pub const OUTDATED: i32 = 2;

/// Repository error - repositories.yaml missing or invalid
pub const REPOSITORY_ERROR: i32 = 3;

/// Release source error - releases could not be listed
pub const RELEASE_SOURCE_ERROR: i32 = 4;

/// Output error - results could not be rendered or written
pub const OUTPUT_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
