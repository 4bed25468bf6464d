//! Image filters
//!
//! Every filter reads from one RGB buffer and returns a freshly allocated
//! one of the same dimensions. Filters hold only their construction-time
//! parameters, so the same instance always maps the same input to the same
//! output.

pub mod advanced;
pub mod basic;
pub mod color;
pub mod restore;

pub use advanced::{
    ClarityFilter, ColorChannelFilter, ColorTemperatureFilter, ShadowsHighlightsFilter,
    UnsharpMaskFilter, VibranceFilter,
};
pub use basic::{BrightnessFilter, ContrastFilter, SaturationFilter, SharpnessFilter};
pub use restore::{ColorBalanceFilter, DespeckleFilter, GaussianBlurFilter};

use crate::kernels::MAX_SIGMA;
use crate::types::{Error, Result};
use image::RgbImage;
use std::any::Any;
use std::fmt;

/// Upcast helper so boxed filters can be inspected by concrete type
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A pure image-to-image transformation with fixed parameters
pub trait Filter: AsAny + fmt::Debug + Send + Sync {
    /// Human-readable identifier, e.g. `"Brightness"` or `"RedChannel"`
    fn name(&self) -> String;

    /// Transform `image` into a new buffer
    fn apply(&self, image: &RgbImage) -> Result<RgbImage>;

    /// Single scalar factor, for filters that have one
    fn factor(&self) -> Option<f32> {
        None
    }
}

impl dyn Filter {
    /// Borrow the filter as its concrete type
    pub fn downcast_ref<T: Filter + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Reject blur radii outside `[0, MAX_SIGMA]`
pub(crate) fn check_radius(filter: &dyn Filter, radius: f32) -> Result<()> {
    if radius.is_finite() && (0.0..=MAX_SIGMA).contains(&radius) {
        return Ok(());
    }
    Err(Error::Filter {
        filter: filter.name(),
        reason: format!("radius must be within [0, {}], got {}", MAX_SIGMA, radius),
    })
}
