use crate::color::{ColorScheme, Rgba};
use serde::{Deserialize, Serialize};

/// Width (logical px) below which the field is considered a narrow/mobile viewport
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Spawn padding on every side of the surface
pub const SPAWN_MARGIN: f32 = 10.0;

/// Upper bound on the particle count; the connection pass is quadratic
pub const MAX_PARTICLES: usize = 500;

/// Particle field parameters. Fixed for the lifetime of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles on wide viewports (halved below the breakpoint)
    pub particle_count: usize,
    /// Maximum distance (logical px) at which two particles are joined by a line
    pub connection_distance: f32,
    /// Pointer interaction radius. Pointer interaction is currently a no-op.
    pub mouse_radius: f32,
    /// Particle fill color
    pub base_color: Rgba,
    /// Connection line color; its alpha is the opacity of the shortest lines
    pub line_color: Rgba,
    /// Velocity magnitude in logical px per frame
    pub particle_speed: f32,
    /// Viewport width below which the particle count is halved
    pub mobile_breakpoint: f32,
    /// Spawn padding on every side
    pub margin: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        let scheme = ColorScheme::default();
        Self {
            particle_count: 60,
            connection_distance: 150.0,
            mouse_radius: 150.0,
            base_color: scheme.base_color(),
            line_color: scheme.line_color(),
            particle_speed: 0.3, // very slow, subtle
            mobile_breakpoint: MOBILE_BREAKPOINT,
            margin: SPAWN_MARGIN,
        }
    }
}

impl FieldConfig {
    /// Replace non-finite or negative values with something harmless and cap the
    /// particle count. A zero count or zero distance is valid and just renders less.
    pub fn sanitized(mut self) -> Self {
        let non_negative = |v: f32, fallback: f32| if v.is_finite() && v >= 0.0 { v } else { fallback };
        let defaults = Self::default();
        self.particle_count = self.particle_count.min(MAX_PARTICLES);
        self.connection_distance = non_negative(self.connection_distance, 0.0);
        self.mouse_radius = non_negative(self.mouse_radius, 0.0);
        self.particle_speed = non_negative(self.particle_speed, defaults.particle_speed);
        self.mobile_breakpoint = non_negative(self.mobile_breakpoint, defaults.mobile_breakpoint);
        self.margin = non_negative(self.margin, defaults.margin);
        self
    }

    /// Number of particles to create for a surface of the given width.
    /// Odd counts round up when halved.
    pub fn effective_count(&self, width: f32) -> usize {
        if width < self.mobile_breakpoint {
            self.particle_count.div_ceil(2)
        } else {
            self.particle_count
        }
    }

    /// Base opacity of connection lines (the line color's alpha)
    pub fn line_base_opacity(&self) -> f32 {
        self.line_color.a
    }

    /// Swap both colors for a built-in scheme
    pub fn apply_scheme(&mut self, scheme: ColorScheme) {
        self.base_color = scheme.base_color();
        self.line_color = scheme.line_color();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_count_halves_below_breakpoint() {
        let config = FieldConfig::default();
        assert_eq!(config.effective_count(1000.0), 60);
        assert_eq!(config.effective_count(768.0), 60);
        assert_eq!(config.effective_count(767.9), 30);
        assert_eq!(config.effective_count(500.0), 30);
    }

    #[test]
    fn test_effective_count_odd() {
        let config = FieldConfig {
            particle_count: 7,
            ..FieldConfig::default()
        };
        assert_eq!(config.effective_count(100.0), 4);
        assert_eq!(config.effective_count(1000.0), 7);

        let single = FieldConfig {
            particle_count: 1,
            ..FieldConfig::default()
        };
        assert_eq!(single.effective_count(100.0), 1);
    }

    #[test]
    fn test_sanitized() {
        let config = FieldConfig {
            connection_distance: f32::NAN,
            particle_speed: -1.0,
            margin: f32::INFINITY,
            ..FieldConfig::default()
        }
        .sanitized();
        assert_eq!(config.connection_distance, 0.0);
        assert_eq!(config.particle_speed, 0.3);
        assert_eq!(config.margin, SPAWN_MARGIN);
    }

    #[test]
    fn test_sanitized_caps_particle_count() {
        let config = FieldConfig {
            particle_count: 100_000,
            ..FieldConfig::default()
        }
        .sanitized();
        assert_eq!(config.particle_count, MAX_PARTICLES);
        assert_eq!(FieldConfig::default().sanitized().particle_count, 60);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FieldConfig = serde_json::from_str(r#"{"particle_count": 12}"#).unwrap();
        assert_eq!(config.particle_count, 12);
        assert_eq!(config.connection_distance, 150.0);
        assert_eq!(config.line_base_opacity(), 0.15);
    }
}
