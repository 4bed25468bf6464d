//! Slide restoration
//!
//! A [`ProfileRegistry`] holds named parameter bundles for common film-aging
//! patterns. A [`SlideRestorer`] borrows a registry and applies one profile to
//! an image, either by name or by picking one from an analysis result.

pub mod assess;
pub mod profiles;
pub mod restorer;

pub use assess::{Characteristic, SlideAssessment};
pub use profiles::ProfileRegistry;
pub use restorer::{ProfileChoice, ProfileSource, RestoreOptions, SlideRestorer};
