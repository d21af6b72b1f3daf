use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// A color stop in a gradient, mapping a normalized height to an RGB color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Normalized height value [0.0, 1.0]
    pub position: f32,

    /// RGB color (each component in range [0.0, 1.0])
    pub color: [f32; 3],
}

impl ColorStop {
    pub fn new(position: f32, color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// An alpha stop, positioned independently from the color stops
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaStop {
    pub position: f32,
    pub alpha: f32,
}

impl AlphaStop {
    pub fn new(position: f32, alpha: f32) -> Self {
        Self { position, alpha }
    }
}

/// How values between two stops are resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradientMode {
    /// Linear interpolation between the bracketing stops
    #[default]
    Blend,
    /// Hard steps: the upper bracketing stop wins
    Fixed,
}

/// User-editable gradient, stored as part of the generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRamp {
    pub mode: GradientMode,
    pub color_stops: Vec<ColorStop>,
    pub alpha_stops: Vec<AlphaStop>,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::grayscale()
    }
}

impl ColorRamp {
    pub fn new(color_stops: Vec<ColorStop>, alpha_stops: Vec<AlphaStop>) -> Self {
        Self {
            mode: GradientMode::Blend,
            color_stops,
            alpha_stops,
        }
    }

    /// Fully opaque ramp from color stops alone
    pub fn opaque(color_stops: Vec<ColorStop>) -> Self {
        Self::new(color_stops, vec![AlphaStop::new(0.0, 1.0)])
    }

    pub fn with_mode(mut self, mode: GradientMode) -> Self {
        self.mode = mode;
        self
    }

    /// Create a ramp with Earth-like terrain colors
    /// Shallow water -> Beach -> Grass -> Rock -> Snow
    pub fn earth_style() -> Self {
        Self::opaque(vec![
            // Shallow water (blue)
            ColorStop::new(0.0, [0.1, 0.3, 0.8]),
            // Beach (light sand)
            ColorStop::new(0.15, [0.8, 0.8, 0.5]),
            // Grass (green)
            ColorStop::new(0.3, [0.2, 0.6, 0.2]),
            // Hills (dark green)
            ColorStop::new(0.55, [0.4, 0.5, 0.2]),
            // Rock (brown)
            ColorStop::new(0.75, [0.5, 0.4, 0.3]),
            // Snow peaks (white)
            ColorStop::new(1.0, [0.95, 0.95, 0.95]),
        ])
    }

    /// Create a simple grayscale ramp
    pub fn grayscale() -> Self {
        Self::opaque(vec![
            ColorStop::new(0.0, [0.0, 0.0, 0.0]),
            ColorStop::new(1.0, [1.0, 1.0, 1.0]),
        ])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.color_stops.is_empty() {
            return Err(ConfigError::EmptyColorRamp);
        }
        if self.alpha_stops.is_empty() {
            return Err(ConfigError::EmptyAlphaRamp);
        }
        if let Some(index) = self.color_stops.iter().position(|s| !s.position.is_finite()) {
            return Err(ConfigError::InvalidColorStop { index });
        }
        if let Some(index) = self.alpha_stops.iter().position(|s| !s.position.is_finite()) {
            return Err(ConfigError::InvalidAlphaStop { index });
        }
        Ok(())
    }
}

/// Maps normalized heights to colors using a validated, sorted ramp
#[derive(Debug, Clone)]
pub struct ColorMapper {
    mode: GradientMode,
    colors: Vec<(f32, [f32; 3])>,
    alphas: Vec<(f32, [f32; 1])>,
}

impl ColorMapper {
    /// Stops are sorted by position; equal positions keep their given order.
    pub fn new(ramp: &ColorRamp) -> Result<Self, ConfigError> {
        ramp.validate()?;

        let mut colors: Vec<_> = ramp
            .color_stops
            .iter()
            .map(|stop| (stop.position, stop.color))
            .collect();
        let mut alphas: Vec<_> = ramp
            .alpha_stops
            .iter()
            .map(|stop| (stop.position, [stop.alpha]))
            .collect();

        colors.sort_by(|a, b| a.0.total_cmp(&b.0));
        alphas.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(Self {
            mode: ramp.mode,
            colors,
            alphas,
        })
    }

    /// RGBA color for a normalized height, `t` is clamped to [0.0, 1.0]
    pub fn evaluate(&self, t: f32) -> [f32; 4] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let [r, g, b] = sample_stops(&self.colors, t, self.mode);
        let [a] = sample_stops(&self.alphas, t, self.mode);

        [r, g, b, a]
    }
}

/// `stops` must be non-empty and sorted by position
fn sample_stops<const N: usize>(stops: &[(f32, [f32; N])], t: f32, mode: GradientMode) -> [f32; N] {
    let first = stops[0];
    let last = stops[stops.len() - 1];

    if stops.len() == 1 || t <= first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }

    let upper = match stops.iter().position(|(position, _)| *position >= t) {
        Some(upper) if upper > 0 => upper,
        _ => return first.1,
    };
    let (lower, upper) = (stops[upper - 1], stops[upper]);

    if mode == GradientMode::Fixed {
        return upper.1;
    }

    let range = upper.0 - lower.0;
    let f = if range > 0.0 { (t - lower.0) / range } else { 0.0 };

    let mut out = lower.1;
    for (i, value) in out.iter_mut().enumerate() {
        *value = lerp(lower.1[i], upper.1[i], f);
    }
    out
}

/// Linear interpolation between two values
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 3] = [1.0, 0.0, 0.0];

    fn black_to_white() -> ColorMapper {
        ColorMapper::new(&ColorRamp::grayscale()).unwrap()
    }

    #[test]
    fn test_interpolate_boundary_values() {
        let mapper = black_to_white();

        assert_eq!(mapper.evaluate(0.0), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(mapper.evaluate(1.0), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_interpolate_middle_value() {
        let color_mid = black_to_white().evaluate(0.5);

        for i in 0..3 {
            assert!(
                (color_mid[i] - 0.5).abs() < 0.01,
                "Component {} should be ~0.5, got {}",
                i,
                color_mid[i]
            );
        }
    }

    #[test]
    fn test_interpolate_clamping() {
        let mapper = black_to_white();

        assert_eq!(mapper.evaluate(-0.5), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(mapper.evaluate(1.5), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(mapper.evaluate(f32::NAN), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_single_stop_returns_its_color_everywhere() {
        let ramp = ColorRamp::new(
            vec![ColorStop::new(0.5, RED)],
            vec![AlphaStop::new(0.5, 1.0)],
        );
        let mapper = ColorMapper::new(&ramp).unwrap();

        for t in [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0] {
            assert_eq!(mapper.evaluate(t), [1.0, 0.0, 0.0, 1.0], "t = {}", t);
        }
    }

    #[test]
    fn test_alpha_stops_are_independent() {
        let ramp = ColorRamp::new(
            vec![
                ColorStop::new(0.0, [0.0, 0.0, 0.0]),
                ColorStop::new(1.0, [1.0, 1.0, 1.0]),
            ],
            vec![AlphaStop::new(0.0, 0.0), AlphaStop::new(0.25, 1.0)],
        );
        let mapper = ColorMapper::new(&ramp).unwrap();

        let quarter = mapper.evaluate(0.25);
        assert!((quarter[0] - 0.25).abs() < 1e-6);
        assert_eq!(quarter[3], 1.0);

        let eighth = mapper.evaluate(0.125);
        assert!((eighth[3] - 0.5).abs() < 1e-6);

        // Past the last alpha stop the alpha holds while color keeps blending
        let three_quarters = mapper.evaluate(0.75);
        assert_eq!(three_quarters[3], 1.0);
        assert!((three_quarters[0] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_multiple_stops_interpolation() {
        let ramp = ColorRamp::opaque(vec![
            ColorStop::new(0.0, [0.0, 0.0, 0.0]), // Black
            ColorStop::new(0.5, RED),             // Red
            ColorStop::new(1.0, [1.0, 1.0, 1.0]), // White
        ]);
        let mapper = ColorMapper::new(&ramp).unwrap();

        let quarter = mapper.evaluate(0.25);
        assert!(quarter[0] > 0.4 && quarter[0] < 0.6);
        assert!(quarter[1] < 0.1);
        assert!(quarter[2] < 0.1);

        let three_quarter = mapper.evaluate(0.75);
        assert!(three_quarter[0] > 0.9);
        assert!(three_quarter[1] > 0.4 && three_quarter[1] < 0.6);
        assert!(three_quarter[2] > 0.4 && three_quarter[2] < 0.6);
    }

    #[test]
    fn test_unordered_stops_are_sorted() {
        let ramp = ColorRamp::opaque(vec![
            ColorStop::new(1.0, [1.0, 1.0, 1.0]),
            ColorStop::new(0.0, [0.0, 0.0, 0.0]),
            ColorStop::new(0.5, [0.5, 0.0, 0.0]),
        ]);
        let mapper = ColorMapper::new(&ramp).unwrap();

        assert_eq!(mapper.evaluate(0.0), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(mapper.evaluate(1.0), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(mapper.evaluate(0.5), [0.5, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_fixed_mode_steps() {
        let ramp = ColorRamp::opaque(vec![
            ColorStop::new(0.0, [0.0, 0.0, 0.0]),
            ColorStop::new(0.5, RED),
            ColorStop::new(1.0, [1.0, 1.0, 1.0]),
        ])
        .with_mode(GradientMode::Fixed);
        let mapper = ColorMapper::new(&ramp).unwrap();

        assert_eq!(mapper.evaluate(0.2), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(mapper.evaluate(0.5), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(mapper.evaluate(0.6), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_empty_ramps_are_rejected() {
        let no_colors = ColorRamp::new(vec![], vec![AlphaStop::new(0.0, 1.0)]);
        assert_eq!(
            ColorMapper::new(&no_colors).unwrap_err(),
            ConfigError::EmptyColorRamp
        );

        let no_alpha = ColorRamp::new(vec![ColorStop::new(0.0, RED)], vec![]);
        assert_eq!(
            ColorMapper::new(&no_alpha).unwrap_err(),
            ConfigError::EmptyAlphaRamp
        );
    }

    #[test]
    fn test_non_finite_stop_positions_are_rejected() {
        let nan_color = ColorRamp::new(
            vec![ColorStop::new(f32::NAN, RED)],
            vec![AlphaStop::new(0.5, 1.0)],
        );
        assert_eq!(
            nan_color.validate(),
            Err(ConfigError::InvalidColorStop { index: 0 })
        );
        assert!(ColorMapper::new(&nan_color).is_err());

        let nan_alpha = ColorRamp::new(
            vec![ColorStop::new(0.0, RED)],
            vec![AlphaStop::new(0.0, 1.0), AlphaStop::new(f32::INFINITY, 0.5)],
        );
        assert_eq!(
            nan_alpha.validate(),
            Err(ConfigError::InvalidAlphaStop { index: 1 })
        );
        assert!(ColorMapper::new(&nan_alpha).is_err());
    }

    #[test]
    fn test_sampling_unsorted_or_nan_stops_does_not_panic() {
        let single = [(f32::NAN, [0.25])];
        assert_eq!(sample_stops(&single, 0.5, GradientMode::Blend), [0.25]);

        let nan_first = [(f32::NAN, [0.25]), (1.0, [1.0])];
        assert_eq!(sample_stops(&nan_first, 0.5, GradientMode::Blend), [0.25]);

        let nan_last = [(0.0, [0.0]), (f32::NAN, [1.0])];
        assert_eq!(sample_stops(&nan_last, 0.5, GradientMode::Fixed), [0.0]);
    }

    #[test]
    fn test_earth_style_preset() {
        let mapper = ColorMapper::new(&ColorRamp::earth_style()).unwrap();

        let water = mapper.evaluate(0.0);
        let peak = mapper.evaluate(1.0);

        assert!(water[2] > water[0]);
        assert!(peak[0] > 0.8 && peak[1] > 0.8 && peak[2] > 0.8);

        for h in [0.0, 0.2, 0.4, 0.6, 0.8, 1.0] {
            for component in mapper.evaluate(h) {
                assert!((0.0..=1.0).contains(&component));
            }
        }
    }

    #[test]
    fn test_color_smoothness() {
        let mapper = ColorMapper::new(&ColorRamp::earth_style()).unwrap();

        let steps = 100;
        let mut prev_color = mapper.evaluate(0.0);

        for i in 1..=steps {
            let h = i as f32 / steps as f32;
            let color = mapper.evaluate(h);

            let diff: f32 = (0..3).map(|j| (color[j] - prev_color[j]).abs()).sum();

            assert!(
                diff < 0.3,
                "Color change too abrupt at height {}: diff = {}",
                h,
                diff
            );

            prev_color = color;
        }
    }
}
