//! Apple platform destinations for xcframaker builds.
//!
//! Every platform a library can be archived for carries three names:
//! - **Identifier:** the user-facing name (`ios-simulator`)
//! - **Destination:** the generic `xcodebuild -destination` value
//! - **Suffix:** the SDK name used to namespace per-platform outputs

pub mod error;
pub mod platform;

pub use error::{Result, TargetError};
pub use platform::Platform;
