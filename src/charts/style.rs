//! Chart styling: the "darkgrid" look, group palette and heatmap colormaps.

use super::VizError;
use plotters::prelude::*;
use std::str::FromStr;

/// Plot-area fill of the darkgrid style
pub const DARKGRID_BACKGROUND: RGBColor = RGBColor(234, 234, 242);

pub const PALETTE: [RGBColor; 10] = [
    RGBColor(52, 152, 219),  // Blue
    RGBColor(231, 76, 60),   // Red
    RGBColor(46, 204, 113),  // Green
    RGBColor(155, 89, 182),  // Purple
    RGBColor(243, 156, 18),  // Orange
    RGBColor(26, 188, 156),  // Teal
    RGBColor(233, 30, 99),   // Pink
    RGBColor(0, 188, 212),   // Cyan
    RGBColor(255, 87, 34),   // Deep Orange
    RGBColor(121, 85, 72),   // Brown
];

/// Colour for the `index`-th series.
pub fn palette_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Shared look of every chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Fill behind the whole figure
    pub figure_background: RGBColor,
    /// Fill of the plotting area
    pub background: RGBColor,
    pub grid_color: RGBColor,
    pub font_family: String,
    pub title_size: u32,
    pub label_size: u32,
    pub tick_size: u32,
    /// Overrides each chart's own default size when set
    pub dimensions: Option<(u32, u32)>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            figure_background: WHITE,
            background: DARKGRID_BACKGROUND,
            grid_color: WHITE,
            font_family: "sans-serif".to_string(),
            title_size: 28,
            label_size: 22,
            tick_size: 16,
            dimensions: None,
        }
    }
}

impl ChartStyle {
    /// Set a fixed figure size for every chart
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    pub fn background(mut self, color: RGBColor) -> Self {
        self.background = color;
        self
    }

    pub fn grid_color(mut self, color: RGBColor) -> Self {
        self.grid_color = color;
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub(crate) fn size_or(&self, default: (u32, u32)) -> (u32, u32) {
        self.dimensions.unwrap_or(default)
    }

    pub(crate) fn title_font(&self) -> FontDesc<'_> {
        (self.font_family.as_str(), self.title_size)
            .into_font()
            .style(FontStyle::Bold)
    }

    pub(crate) fn label_font(&self) -> FontDesc<'_> {
        (self.font_family.as_str(), self.label_size).into_font()
    }

    pub(crate) fn tick_font(&self) -> FontDesc<'_> {
        (self.font_family.as_str(), self.tick_size).into_font()
    }
}

/// Set up the darkgrid style used for consistent visualizations.
pub fn setup_style() -> ChartStyle {
    log::debug!("using darkgrid chart style");
    ChartStyle::default()
}

/// Colour scales for the correlation heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    #[default]
    Coolwarm,
    Viridis,
    Greys,
}

impl Colormap {
    fn stops(self) -> &'static [(u8, u8, u8)] {
        match self {
            Colormap::Coolwarm => &[(59, 76, 192), (221, 221, 221), (180, 4, 38)],
            Colormap::Viridis => &[
                (68, 1, 84),
                (59, 82, 139),
                (33, 145, 140),
                (94, 201, 98),
                (253, 231, 37),
            ],
            Colormap::Greys => &[(255, 255, 255), (0, 0, 0)],
        }
    }

    /// Colour at `t` in `[0, 1]`; values outside are clamped.
    pub fn color_at(self, t: f64) -> RGBColor {
        let stops = self.stops();
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (stops.len() - 1) as f64;
        let i = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - i as f64;
        let (a, b) = (stops[i], stops[i + 1]);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

impl FromStr for Colormap {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coolwarm" => Ok(Colormap::Coolwarm),
            "viridis" => Ok(Colormap::Viridis),
            "greys" | "grays" => Ok(Colormap::Greys),
            other => Err(VizError::InvalidConfiguration(format!(
                "unknown colormap '{other}' (expected coolwarm, viridis or greys)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colormap_endpoints() {
        assert_eq!(Colormap::Greys.color_at(0.0), RGBColor(255, 255, 255));
        assert_eq!(Colormap::Greys.color_at(1.0), RGBColor(0, 0, 0));
        assert_eq!(Colormap::Coolwarm.color_at(0.5), RGBColor(221, 221, 221));
        assert_eq!(Colormap::Coolwarm.color_at(7.0), RGBColor(180, 4, 38));
    }

    #[test]
    fn colormap_parse() {
        assert_eq!("CoolWarm".parse::<Colormap>().unwrap(), Colormap::Coolwarm);
        assert!("jet".parse::<Colormap>().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn style_dimensions_override() {
        let style = setup_style();
        assert_eq!(style.size_or((10, 20)), (10, 20));
        assert_eq!(style.dimensions(300, 200).size_or((10, 20)), (300, 200));
    }
}
