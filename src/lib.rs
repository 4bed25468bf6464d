//! PictureForge: recommendation-driven photo enhancement and slide restoration
//!
//! Free-text enhancement recommendations (typically produced by an external
//! vision model) are parsed into an ordered [`Pipeline`] of image filters.
//! Scanned slides can be restored with named [`SlideProfile`]s, chosen
//! explicitly or from an analysis result.
//!
//! ```no_run
//! use picture_forge::{enhance_image, RecommendationEntry};
//! use std::path::Path;
//!
//! let recs = RecommendationEntry::from_texts(["BRIGHTNESS: increase by 25%"]);
//! let written = enhance_image(Path::new("scan.jpg"), &recs, None, 95);
//! ```

pub mod analysis;
pub mod config;
pub mod filters;
pub mod image_io;
pub mod kernels;
pub mod pipeline;
pub mod recommendations;
pub mod restoration;
pub mod types;

pub use analysis::AnalysisResult;
pub use config::Config;
pub use filters::Filter;
pub use pipeline::Pipeline;
pub use recommendations::{RecommendationEntry, RecommendationParser};
pub use restoration::{ProfileRegistry, RestoreOptions, SlideRestorer};
pub use types::{Error, Result, SlideProfile, SlideProfileDetection};

use log::{error, info};
use std::path::{Path, PathBuf};

/// Enhance `source` with `parser` and write a JPEG
///
/// Without `output` the source file is overwritten. Nothing is written when
/// no recommendation parses or any filter fails.
pub fn try_enhance_with(
    parser: &RecommendationParser,
    source: &Path,
    recommendations: &[RecommendationEntry],
    output: Option<&Path>,
    quality: u8,
) -> Result<PathBuf> {
    let pipeline = parser.parse(recommendations);
    if pipeline.is_empty() {
        return Err(Error::EmptyPipeline);
    }
    info!("Enhancing {} with {}", source.display(), pipeline);

    let image = image_io::load_image(source)?;
    let enhanced = pipeline.run(&image)?;

    let out = output.unwrap_or(source).to_path_buf();
    image_io::save_jpeg(&out, &enhanced, quality)?;
    info!("Enhanced image saved to {}", out.display());
    Ok(out)
}

/// [`try_enhance_with`] using the default parser settings
pub fn try_enhance_image(
    source: &Path,
    recommendations: &[RecommendationEntry],
    output: Option<&Path>,
    quality: u8,
) -> Result<PathBuf> {
    try_enhance_with(&RecommendationParser::new(), source, recommendations, output, quality)
}

/// Enhance an image, logging failures and returning `None` instead of an error
pub fn enhance_image(
    source: &Path,
    recommendations: &[RecommendationEntry],
    output: Option<&Path>,
    quality: u8,
) -> Option<PathBuf> {
    match try_enhance_image(source, recommendations, output, quality) {
        Ok(path) => Some(path),
        Err(e) => {
            error!("Failed to enhance {}: {}", source.display(), e);
            None
        }
    }
}

/// Enhance an image with the recommendations carried by an analysis result
pub fn enhance_from_analysis(
    source: &Path,
    analysis: &AnalysisResult,
    output: Option<&Path>,
    quality: u8,
) -> Option<PathBuf> {
    enhance_image(source, analysis.recommendations(), output, quality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_unparseable_recommendations_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.png");
        RgbImage::from_pixel(8, 8, Rgb([100, 100, 100]))
            .save(&source)
            .unwrap();
        let out = dir.path().join("out.jpg");

        let recs = RecommendationEntry::from_texts(["make it pop", "CONTRAST: boost a lot"]);
        assert!(matches!(
            try_enhance_image(&source, &recs, Some(&out), 95),
            Err(Error::EmptyPipeline)
        ));
        assert!(enhance_image(&source, &recs, Some(&out), 95).is_none());
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_source_is_none() {
        let recs = RecommendationEntry::from_texts(["BRIGHTNESS: increase by 10%"]);
        assert!(enhance_image(Path::new("/nonexistent/in.jpg"), &recs, None, 95).is_none());
    }
}
