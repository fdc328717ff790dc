//! The built-in tools that models can use.

mod calculate;
mod planet_mass;

pub use calculate::{CalculateTool, calculate};
pub use planet_mass::{PlanetMassTool, planet_mass};

/// Renders a number the way observations show it.
///
/// Integral values print without a fraction, very large or very small
/// magnitudes print in scientific notation (`5.972e24`).
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if value != 0.0 && !(1e-4..1e15).contains(&magnitude) {
        format!("{value:e}")
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
