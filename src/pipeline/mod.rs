//! Ordered filter composition

use crate::filters::Filter;
use crate::types::Result;
use image::{DynamicImage, RgbImage};
use log::info;
use std::fmt;
use std::time::Instant;

/// An append-only sequence of filters applied in construction order
#[derive(Debug, Default)]
pub struct Pipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter, returning `self` for chaining
    pub fn add<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Append an already boxed filter
    pub fn push_boxed(&mut self, filter: Box<dyn Filter>) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Convert `image` to RGB8 and apply every filter
    pub fn run(&self, image: &DynamicImage) -> Result<RgbImage> {
        self.run_rgb(image.to_rgb8())
    }

    /// Apply every filter to an RGB8 image
    ///
    /// The first failing filter aborts the run; no partial result is returned.
    pub fn run_rgb(&self, image: RgbImage) -> Result<RgbImage> {
        let mut current = image;
        for filter in &self.filters {
            let start = Instant::now();
            current = filter.apply(&current)?;
            match filter.factor() {
                Some(factor) => info!(
                    "Applied {} (factor {:.2}) in {:.1?}",
                    filter.name(),
                    factor,
                    start.elapsed()
                ),
                None => info!("Applied {} in {:.1?}", filter.name(), start.elapsed()),
            }
        }
        Ok(current)
    }

    pub fn filters(&self) -> &[Box<dyn Filter>] {
        &self.filters
    }

    pub fn get(&self, index: usize) -> Option<&(dyn Filter + 'static)> {
        self.filters.get(index).map(|f| &**f)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pipeline([{}])", self.names().join(", "))
    }
}
