/// Classification engine: severity taxonomies for scores and alert codes.
///
/// Both classifiers are total functions - any input, including garbage,
/// resolves to a defined result. Nothing in this module performs I/O.
///
/// Submodules:
/// - `severity` - GAVI score to severity band (label, color, description)
/// - `alerts`   - alert code to display descriptor with default fallback

pub mod alerts;
pub mod severity;
