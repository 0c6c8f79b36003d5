//! Pipeline configuration

use crate::descriptor::{CropMargin, DescriptorConfig};
use crate::error::PipelineError;
use crate::matching::{RankingConfig, RANK_COLORS};
use crate::similarity::SimilarityConfig;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tilepair_core::{ConnectivityConfig, PathThickness, RegionFilterConfig};

/// Main pipeline configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub region: RegionFilterConfig,
    pub descriptor: DescriptorConfig,
    pub similarity: SimilarityConfig,
    pub connectivity: ConnectivityConfig,
    pub ranking: RankingConfig,
}

impl PipelineConfig {
    /// Fewer, safer hints: tight gates and a thin fixed path band
    pub fn strict() -> Self {
        Self {
            similarity: SimilarityConfig::strict(),
            connectivity: ConnectivityConfig {
                path_thickness: PathThickness::Fixed(4.0),
            },
            ..Default::default()
        }
    }

    /// More hints from noisy captures
    pub fn lenient() -> Self {
        Self {
            similarity: SimilarityConfig::lenient(),
            ..Default::default()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "strict" => Some(Self::strict()),
            "default" => Some(Self::default()),
            "lenient" => Some(Self::lenient()),
            _ => None,
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PipelineError::InvalidConfig(msg));

        let region = &self.region;
        if !(region.min_area_frac >= 0.0 && region.min_area_frac < region.max_area_frac) {
            return invalid(format!(
                "area fractions must satisfy 0 <= min < max, got {} and {}",
                region.min_area_frac, region.max_area_frac
            ));
        }
        if !(region.aspect_min > 0.0 && region.aspect_min < region.aspect_max) {
            return invalid(format!(
                "aspect bounds must satisfy 0 < min < max, got {} and {}",
                region.aspect_min, region.aspect_max
            ));
        }

        let descriptor = &self.descriptor;
        if descriptor.patch_size < 2 || descriptor.patch_size % 2 != 0 {
            return invalid(format!(
                "patch size must be even and at least 2, got {}",
                descriptor.patch_size
            ));
        }
        if descriptor.hue_bins == 0 || descriptor.sat_bins == 0 {
            return invalid("histogram bin counts must be positive".to_string());
        }
        match descriptor.crop_margin {
            CropMargin::Fraction(frac) if !(0.0..0.5).contains(&frac) => {
                return invalid(format!("crop margin fraction must be in [0, 0.5), got {frac}"));
            }
            CropMargin::Pixels(px) if i32::try_from(px).is_err() => {
                return invalid(format!("crop margin of {px} px is out of range"));
            }
            _ => {}
        }

        let similarity = &self.similarity;
        let weights = [
            similarity.zonal_threshold,
            similarity.size_ratio_threshold,
            similarity.hist_weight,
        ];
        if weights.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return invalid(
                "similarity thresholds and weights must be finite and not negative".to_string(),
            );
        }
        if !(-1.0..=1.0).contains(&similarity.hist_threshold) {
            return invalid(format!(
                "histogram threshold must be in [-1, 1], got {}",
                similarity.hist_threshold
            ));
        }

        if let PathThickness::Fixed(px) = self.connectivity.path_thickness {
            if !px.is_finite() || px < 0.0 {
                return invalid(format!("path thickness must be finite and not negative, got {px}"));
            }
        }

        if self.ranking.max_display_pairs > RANK_COLORS.len() {
            return invalid(format!(
                "at most {} pairs can be shown with distinct colors, got {}",
                RANK_COLORS.len(),
                self.ranking.max_display_pairs
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for name in ["strict", "default", "lenient"] {
            let config = PipelineConfig::preset(name).unwrap();
            assert!(config.validate().is_ok(), "{name} preset invalid");
        }
        assert!(PipelineConfig::preset("bogus").is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"similarity":{"zonal_threshold":1200.0}}"#).unwrap();

        assert_eq!(config.similarity.zonal_threshold, 1200.0);
        assert_eq!(config.similarity.hist_threshold, 0.8);
        assert_eq!(config.region, RegionFilterConfig::default());
    }

    #[test]
    fn test_json_roundtrip() -> Result<()> {
        let config = PipelineConfig::strict();
        let json = config.to_json_string()?;
        let back: PipelineConfig = serde_json::from_str(&json)?;
        assert_eq!(back, config);
        Ok(())
    }

    #[test]
    fn test_rejects_odd_patch() {
        let mut config = PipelineConfig::default();
        config.descriptor.patch_size = 31;
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_weights() {
        let mut config = PipelineConfig::default();
        config.similarity.zonal_threshold = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.similarity.hist_weight = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.connectivity.path_thickness = PathThickness::Fixed(f32::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_pixel_margin() {
        let mut config = PipelineConfig::default();
        config.descriptor.crop_margin = CropMargin::Pixels(u32::MAX);
        assert!(config.validate().is_err());

        config.descriptor.crop_margin = CropMargin::Pixels(6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_display_budget_limited_by_colors() {
        let mut config = PipelineConfig::default();
        config.ranking.max_display_pairs = RANK_COLORS.len();
        assert!(config.validate().is_ok());

        config.ranking.max_display_pairs = RANK_COLORS.len() + 1;
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_inverted_area_bounds() {
        let mut config = PipelineConfig::default();
        config.region.min_area_frac = 0.2;
        assert!(config.validate().is_err());
    }
}
