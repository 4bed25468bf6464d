//! Applying slide profiles to images

use super::assess::SlideAssessment;
use super::profiles::ProfileRegistry;
use crate::analysis::AnalysisResult;
use crate::filters::{
    BrightnessFilter, ColorBalanceFilter, ContrastFilter, DespeckleFilter, GaussianBlurFilter,
    SaturationFilter, SharpnessFilter,
};
use crate::image_io;
use crate::pipeline::Pipeline;
use crate::types::{Result, SlideProfile, DEFAULT_JPEG_QUALITY};
use image::{DynamicImage, RgbImage};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Per-restorer switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Run the profile's Gaussian denoise step (when the profile asks for it)
    pub denoise: bool,
    /// Run the 3×3 median despeckle step
    pub despeckle: bool,
    pub jpeg_quality: u8,
    /// Detections below this confidence are logged as unreliable
    pub confidence_threshold: u8,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            denoise: true,
            despeckle: true,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            confidence_threshold: 50,
        }
    }
}

/// Where an automatically chosen profile came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    /// Typed `slide_profile` detection
    Detection,
    /// First entry of the legacy `slide_profiles` list
    Suggestion,
    Heuristic(SlideAssessment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChoice {
    pub profile_name: String,
    pub confidence: u8,
    pub source: ProfileSource,
}

/// Restores scanned slides with profiles from a shared registry
#[derive(Debug, Clone)]
pub struct SlideRestorer<'a> {
    registry: &'a ProfileRegistry,
    options: RestoreOptions,
}

impl<'a> SlideRestorer<'a> {
    pub fn new(registry: &'a ProfileRegistry) -> Self {
        Self::with_options(registry, RestoreOptions::default())
    }

    pub fn with_options(registry: &'a ProfileRegistry, options: RestoreOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &ProfileRegistry {
        self.registry
    }

    pub fn options(&self) -> &RestoreOptions {
        &self.options
    }

    /// Filters for `profile`, in restoration order
    ///
    /// despeckle, colour balance, brightness, contrast, saturation, denoise,
    /// sharpness. Optional steps are left out when disabled.
    pub fn pipeline_for(&self, profile: &SlideProfile) -> Pipeline {
        let mut pipeline = Pipeline::new();
        if self.options.despeckle {
            pipeline.add(DespeckleFilter);
        }
        if !profile.color_balance.is_neutral() {
            pipeline.add(ColorBalanceFilter::new(profile.color_balance));
        }
        pipeline
            .add(BrightnessFilter::new(profile.brightness))
            .add(ContrastFilter::new(profile.contrast))
            .add(SaturationFilter::new(profile.saturation));
        if self.options.denoise && profile.denoise {
            pipeline.add(GaussianBlurFilter::new(profile.denoise_radius));
        }
        pipeline.add(SharpnessFilter::new(profile.sharpness));
        pipeline
    }

    /// Restore an in-memory image; unknown profile names fall back to "aged"
    pub fn restore_image(&self, image: &DynamicImage, profile_name: &str) -> Result<RgbImage> {
        let (key, profile) = self.registry.resolve(profile_name)?;
        info!("Restoring slide with '{}' profile: {}", key, profile.description);
        self.pipeline_for(profile).run(image)
    }

    /// Restore the image at `input` and write it as JPEG
    ///
    /// Without `output` the source file is overwritten.
    pub fn restore(&self, input: &Path, profile_name: &str, output: Option<&Path>) -> Result<PathBuf> {
        let image = image_io::load_image(input)?;
        let restored = self.restore_image(&image, profile_name)?;

        let out = output.unwrap_or(input).to_path_buf();
        image_io::save_jpeg(&out, &restored, self.options.jpeg_quality)?;
        info!("Slide restoration complete: {}", out.display());
        Ok(out)
    }

    /// Pick a profile: explicit detection, then legacy suggestion, then heuristic
    pub fn resolve_profile(&self, analysis: &AnalysisResult) -> ProfileChoice {
        if let Some(detection) = &analysis.slide_profile {
            if detection.confidence < self.options.confidence_threshold {
                warn!(
                    "Slide profile '{}' detected with low confidence ({}%)",
                    detection.profile_name, detection.confidence
                );
            }
            return ProfileChoice {
                profile_name: detection.profile_name.clone(),
                confidence: detection.confidence,
                source: ProfileSource::Detection,
            };
        }

        if let Some(best) = analysis.slide_profiles.first() {
            return ProfileChoice {
                profile_name: best.profile.clone(),
                confidence: best.confidence,
                source: ProfileSource::Suggestion,
            };
        }

        let assessment = SlideAssessment::from_analysis(analysis);
        info!(
            "No slide profile provided; heuristic condition '{}' suggests '{}'",
            assessment.condition, assessment.recommended_profile
        );
        ProfileChoice {
            profile_name: assessment.recommended_profile.clone(),
            confidence: assessment.confidence,
            source: ProfileSource::Heuristic(assessment),
        }
    }

    /// Choose a profile from `analysis` and restore with it
    pub fn auto_restore(
        &self,
        input: &Path,
        analysis: &AnalysisResult,
        output: Option<&Path>,
    ) -> Result<PathBuf> {
        let choice = self.resolve_profile(analysis);
        info!(
            "Using slide profile '{}' ({}% confidence)",
            choice.profile_name, choice.confidence
        );
        self.restore(input, &choice.profile_name, output)
    }
}
