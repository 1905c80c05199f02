// Rig configuration - pivot table and tilt timing

use super::RigError;
use crate::engine::tween::TweenError;
use glam::Vec2;
use std::time::Duration;

/// Largest head tilt in degrees
pub const MAX_ANGLE: f32 = 10.0;

/// Time to move between two poses
pub const TILT_DURATION: Duration = Duration::from_millis(300);

/// Pivot coordinates in rig-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotTable {
    /// Neck pivot shared by the whole head
    pub head: Vec2,
    /// Attachment point of the left side lock
    pub hair_side_left: Vec2,
    /// Attachment point of the right side lock
    pub hair_side_right: Vec2,
}

/// Static rig configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigConfig {
    pub tilt_duration: Duration,
    /// Degrees, applies to both tilt directions
    pub max_angle: f32,
    pub pivots: PivotTable,
}

/// Kokori's rig, measured on the 1:1 layer artwork
pub const KOKORI_RIG: RigConfig = RigConfig {
    tilt_duration: TILT_DURATION,
    max_angle: MAX_ANGLE,
    pivots: PivotTable {
        head: Vec2::new(682.0, 655.0),
        hair_side_left: Vec2::new(797.0, 585.0),
        hair_side_right: Vec2::new(582.0, 595.0),
    },
};

impl Default for RigConfig {
    fn default() -> Self {
        KOKORI_RIG
    }
}

impl RigConfig {
    /// Override the tilt duration
    pub fn with_tilt_duration(mut self, duration: Duration) -> Self {
        self.tilt_duration = duration;
        self
    }

    /// Override the maximum tilt angle
    pub fn with_max_angle(mut self, degrees: f32) -> Self {
        self.max_angle = degrees;
        self
    }

    /// Check every value before anything is bound
    pub fn validate(&self) -> Result<(), RigError> {
        if self.tilt_duration.is_zero() {
            return Err(TweenError::NonPositiveDuration { millis: 0 }.into());
        }
        if !self.max_angle.is_finite() || self.max_angle <= 0.0 {
            return Err(RigError::InvalidMaxAngle(self.max_angle));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RigConfig::default();
        assert_eq!(config.tilt_duration, Duration::from_millis(300));
        assert_eq!(config.max_angle, 10.0);
        assert_eq!(config.pivots.head, Vec2::new(682.0, 655.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = RigConfig::default()
            .with_tilt_duration(Duration::from_millis(500))
            .with_max_angle(15.0);
        assert_eq!(config.tilt_duration, Duration::from_millis(500));
        assert_eq!(config.max_angle, 15.0);
        assert_eq!(config.pivots, KOKORI_RIG.pivots);
    }

    #[test]
    fn test_invalid_max_angle() {
        for bad in [0.0, -10.0, f32::NAN, f32::INFINITY] {
            let config = RigConfig::default().with_max_angle(bad);
            assert!(matches!(config.validate(), Err(RigError::InvalidMaxAngle(_))));
        }
    }

    #[test]
    fn test_zero_tilt_duration() {
        let config = RigConfig::default().with_tilt_duration(Duration::ZERO);
        assert_eq!(
            config.validate(),
            Err(RigError::Tween(TweenError::NonPositiveDuration { millis: 0 }))
        );
    }
}
