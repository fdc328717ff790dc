use little_react_core::tool::{Error as ToolError, Tool, ToolResult};

use super::format_number;

const PLANET_MASSES: [(&str, f64); 8] = [
    ("mercury", 3.285e23),
    ("venus", 4.867e24),
    ("earth", 5.972e24),
    ("mars", 6.39e23),
    ("jupiter", 1.898e27),
    ("saturn", 5.683e26),
    ("uranus", 8.681e25),
    ("neptune", 1.024e26),
];

/// Looks up the mass of a planet of the solar system, in kilograms.
///
/// The name is matched after trimming whitespace and quotes, ignoring case.
/// Returns `None` for anything that is not one of the eight planets.
pub fn planet_mass(name: &str) -> Option<f64> {
    let name = name
        .trim()
        .trim_matches(|ch| matches!(ch, '"' | '\'' | '`'))
        .trim()
        .to_ascii_lowercase();
    PLANET_MASSES
        .iter()
        .find(|(planet, _)| *planet == name)
        .map(|(_, mass)| *mass)
}

/// A tool for looking up planet masses.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanetMassTool;

impl Tool for PlanetMassTool {
    fn name(&self) -> &str {
        "get_planet_mass"
    }

    fn description(&self) -> &str {
        "Returns the mass of the planet in kg"
    }

    fn example(&self) -> &str {
        "Earth"
    }

    fn execute(&self, argument: &str) -> ToolResult {
        planet_mass(argument).map(format_number).ok_or_else(|| {
            ToolError::invalid_input()
                .with_reason(format!("unknown planet: {}", argument.trim()))
        })
    }
}
