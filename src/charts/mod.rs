//! Charts module - Static chart rendering

mod error;
mod plotter;
mod renderer;
mod style;

pub use error::VizError;
pub use plotter::{ChartHandle, ChartKind, ChartPlotter, Orientation, DEFAULT_BINS};
pub use style::{palette_color, setup_style, ChartStyle, Colormap, DARKGRID_BACKGROUND, PALETTE};
