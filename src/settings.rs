use crate::error::SettingsError;
use crate::ray::Interval;

/// Everything the renderer needs besides the scene and camera.
///
/// Passed by reference into every render call; nothing is read from global state.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Edge length of the viewport rectangle, in scene units.
    pub viewport_size: f64,
    /// Distance from the camera to the viewport.
    pub projection_distance: f64,
    /// Lower parametric bound for primary rays. Hits closer than the viewport are ignored.
    pub near: f64,
    /// Upper parametric bound for primary rays, `f64::INFINITY` for unbounded.
    pub far: f64,
    /// Lower bound for shadow and reflection rays, keeps a surface from occluding itself.
    pub shadow_epsilon: f64,
    /// Number of mirrored bounces. `0` shades primary hits only.
    pub reflection_depth: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            width: 600,
            height: 600,
            viewport_size: 1.0,
            projection_distance: 1.0,
            near: 1.0,
            far: f64::INFINITY,
            shadow_epsilon: 1e-4,
            reflection_depth: 0,
        }
    }
}

fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl RenderSettings {
    pub fn with_size(self, width: u32, height: u32) -> Self {
        RenderSettings { width, height, ..self }
    }

    pub fn with_reflection_depth(self, reflection_depth: u32) -> Self {
        RenderSettings { reflection_depth, ..self }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn primary_range(&self) -> Interval {
        Interval::new(self.near, self.far)
    }

    pub fn secondary_range(&self) -> Interval {
        Interval::above(self.shadow_epsilon)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::EmptyCanvas { width: self.width, height: self.height });
        }
        if !positive_finite(self.viewport_size) {
            return Err(SettingsError::ViewportSize(self.viewport_size));
        }
        if !positive_finite(self.projection_distance) {
            return Err(SettingsError::ProjectionDistance(self.projection_distance));
        }
        if self.primary_range().is_empty() {
            return Err(SettingsError::EmptyRayRange { near: self.near, far: self.far });
        }
        if !positive_finite(self.shadow_epsilon) {
            return Err(SettingsError::ShadowEpsilon(self.shadow_epsilon));
        }
        Ok(())
    }
}
