//! Domain logic - version grammars, casting and bump rules

pub mod bump;
pub mod cast;
pub mod prerelease;
pub mod python;
pub mod simple;
pub mod version;

pub use bump::{bump, BumpDirective, OnInvalidVersion};
pub use cast::cast;
pub use prerelease::PreStage;
pub use python::PythonVersion;
pub use simple::SimpleVersion;
pub use version::{VersionKind, VersionValue};
