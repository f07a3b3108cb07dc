//! Detection implementation submodule.
//!
//! This module contains the internal implementation details for identifying
//! the host distribution. It provides:
//!
//! - `find_executable`: PATH-based executable lookup with fallbacks
//! - `parse_os_release`: `ID` / `VERSION_ID` extraction from os-release text
//! - `query_identity`: `lsb_release -si` with a 2-second timeout
//! - `first_token`: release-marker file parsing

mod identity_query;
mod os_release;
mod path_finder;
mod release_marker;

pub(crate) use identity_query::query_identity;
pub(crate) use os_release::parse_os_release;
pub(crate) use path_finder::find_executable;
pub(crate) use release_marker::first_token;
