//! Test helpers shared across the workspace.
//!
//! [`env`] serialises process environment changes behind RAII guards and
//! [`files`] writes configuration documents into throwaway directories.

pub mod env;
pub mod files;
