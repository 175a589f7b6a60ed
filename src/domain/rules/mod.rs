// Domain rules - Validation policies for assets and trim settings

use serde::{Deserialize, Serialize};

use crate::domain::model::{AssetProbe, TrimRange, VideoAsset};

/// Result of a proactive validation check
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(String),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(message) => Some(message),
        }
    }
}

/// Hard limits a source file must satisfy to become a usable asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetLimits {
    /// Maximum source size in bytes
    pub max_file_size: u64,
    /// Maximum source duration in seconds
    pub max_duration_secs: f64,
}

impl AssetLimits {
    /// Check whether a probe satisfies every limit
    pub fn is_within(&self, probe: &AssetProbe) -> bool {
        probe.duration_secs > 0.0
            && probe.duration_secs <= self.max_duration_secs
            && probe.size_bytes <= self.max_file_size
            && probe.width > 0
            && probe.height > 0
    }

    /// User-facing reason for the first violated limit, if one applies.
    ///
    /// A non-positive duration has no dedicated message; callers fall back to
    /// a generic "invalid video file" message for that case.
    pub fn invalid_reason(&self, probe: &AssetProbe) -> Option<String> {
        if probe.duration_secs > self.max_duration_secs {
            return Some(format!(
                "Duration exceeds the {} minute limit",
                (self.max_duration_secs / 60.0) as u64
            ));
        }
        if probe.size_bytes > self.max_file_size {
            return Some(format!(
                "File size exceeds the {} limit",
                crate::utils::time::format_size(self.max_file_size)
            ));
        }
        if probe.width == 0 || probe.height == 0 {
            return Some("Could not determine video resolution".to_string());
        }
        None
    }
}

/// Validation policy for trim settings
pub struct TrimValidator;

impl TrimValidator {
    /// Validate trim settings against a loaded asset
    pub fn validate_settings(
        range: &TrimRange,
        asset: &VideoAsset,
        min_gap: f64,
    ) -> ValidationOutcome {
        if !asset.is_valid {
            let message = asset
                .invalid_reason
                .clone()
                .unwrap_or_else(|| "Invalid video file".to_string());
            return ValidationOutcome::Invalid(message);
        }

        if range.start < 0.0 {
            return ValidationOutcome::Invalid("Start time cannot be negative".to_string());
        }

        if range.end > asset.duration_secs {
            return ValidationOutcome::Invalid(
                "End time exceeds the video duration".to_string(),
            );
        }

        if range.end <= range.start {
            return ValidationOutcome::Invalid(
                "End time must be greater than the start time".to_string(),
            );
        }

        if range.duration() < min_gap {
            return ValidationOutcome::Invalid(format!(
                "Minimum trim duration is {} seconds",
                min_gap
            ));
        }

        ValidationOutcome::Valid
    }

    /// Validate a candidate start time on its own
    pub fn validate_start_time(time: f64, asset: &VideoAsset) -> ValidationOutcome {
        if time < 0.0 {
            return ValidationOutcome::Invalid("Time cannot be negative".to_string());
        }

        if time >= asset.duration_secs {
            return ValidationOutcome::Invalid(
                "Time exceeds the video duration".to_string(),
            );
        }

        ValidationOutcome::Valid
    }

    /// Validate a candidate end time on its own
    pub fn validate_end_time(time: f64, asset: &VideoAsset) -> ValidationOutcome {
        if time <= 0.0 {
            return ValidationOutcome::Invalid("Time must be greater than zero".to_string());
        }

        if time > asset.duration_secs {
            return ValidationOutcome::Invalid(
                "Time exceeds the video duration".to_string(),
            );
        }

        ValidationOutcome::Valid
    }
}
