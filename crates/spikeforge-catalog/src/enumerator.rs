//! Lazy enumeration of the generated identifier space
//!
//! The full cross product of the four axes runs to six figures, so nothing
//! here ever materializes it: [`IdSpace`] is an iterator that walks tuples in
//! axis order on demand, and [`synthesize_ids`] caps every walk explicitly.

use tracing::trace;

use spikeforge_specs::store::GENERATED_PREFIX;

use crate::axes::{AxisTuple, Style, LANGUAGES, LIBRARIES, PATTERNS, STYLES};
use crate::error::CatalogError;

/// Format the identifier for an axis tuple
///
/// Inverse of [`parse_id`]; axis values contain no separator so the mapping
/// is unambiguous in both directions.
pub fn identifier(tuple: &AxisTuple) -> String {
    format!(
        "{}{}-{}-{}-{}",
        GENERATED_PREFIX,
        tuple.library,
        tuple.pattern,
        tuple.style.as_str(),
        tuple.language
    )
}

/// Parse an identifier back into its axis tuple
///
/// Returns `None` when the identifier does not belong to the generation
/// grammar: wrong prefix, wrong arity, or any axis value outside its closed
/// set. Callers probe speculative identifiers, so this is a value, not an
/// error.
pub fn parse_id(id: &str) -> Option<AxisTuple> {
    let body = id.strip_prefix(GENERATED_PREFIX)?;
    let parts: Vec<&str> = body.split('-').collect();
    if parts.len() != 4 {
        return None;
    }

    let library = *LIBRARIES.iter().find(|l| **l == parts[0])?;
    let pattern = *PATTERNS.iter().find(|p| **p == parts[1])?;
    let style = Style::parse(parts[2])?;
    let language = *LANGUAGES.iter().find(|l| **l == parts[3])?;

    Some(AxisTuple {
        library: library.to_string(),
        pattern: pattern.to_string(),
        style,
        language: language.to_string(),
    })
}

/// Lazy walk over a sub-space of the generated identifiers
///
/// Yields tuples in axis order (library-major, language-minor). Cursor-based,
/// so memory use is constant no matter how far the walk runs.
pub struct IdSpace {
    libraries: Vec<&'static str>,
    patterns: Vec<&'static str>,
    styles: Vec<&'static str>,
    languages: Vec<&'static str>,
    cursor: [usize; 4],
    exhausted: bool,
}

impl IdSpace {
    /// Walk the full generated space
    pub fn all() -> Self {
        Self::over(
            LIBRARIES.to_vec(),
            PATTERNS.to_vec(),
            STYLES.to_vec(),
            LANGUAGES.to_vec(),
        )
    }

    /// Walk a validated sub-space
    fn over(
        libraries: Vec<&'static str>,
        patterns: Vec<&'static str>,
        styles: Vec<&'static str>,
        languages: Vec<&'static str>,
    ) -> Self {
        let exhausted =
            libraries.is_empty() || patterns.is_empty() || styles.is_empty() || languages.is_empty();
        Self {
            libraries,
            patterns,
            styles,
            languages,
            cursor: [0; 4],
            exhausted,
        }
    }

    /// Total number of tuples this walk covers
    pub fn total(&self) -> usize {
        self.libraries.len() * self.patterns.len() * self.styles.len() * self.languages.len()
    }
}

impl Iterator for IdSpace {
    type Item = AxisTuple;

    fn next(&mut self) -> Option<AxisTuple> {
        if self.exhausted {
            return None;
        }

        let [li, pi, si, gi] = self.cursor;
        let tuple = AxisTuple {
            library: self.libraries[li].to_string(),
            pattern: self.patterns[pi].to_string(),
            // Styles in the walk come from the closed table, so parse cannot fail.
            style: Style::parse(self.styles[si]).unwrap_or(Style::Basic),
            language: self.languages[gi].to_string(),
        };

        // Advance language-minor, library-major.
        let mut idx = 3;
        loop {
            let (len, pos) = match idx {
                0 => (self.libraries.len(), &mut self.cursor[0]),
                1 => (self.patterns.len(), &mut self.cursor[1]),
                2 => (self.styles.len(), &mut self.cursor[2]),
                _ => (self.languages.len(), &mut self.cursor[3]),
            };
            *pos += 1;
            if *pos < len {
                break;
            }
            *pos = 0;
            if idx == 0 {
                self.exhausted = true;
                break;
            }
            idx -= 1;
        }

        Some(tuple)
    }
}

/// Lazily cross the given axis subsets into identifiers
///
/// Validates every value against its closed set first; an unknown value is a
/// [`CatalogError::NotFound`] naming the axis and the value. The walk stops
/// at `max` identifiers, whatever the theoretical size of the sub-space.
pub fn synthesize_ids(
    libraries: &[String],
    patterns: &[String],
    styles: &[String],
    languages: &[String],
    max: usize,
) -> Result<Vec<String>, CatalogError> {
    let libraries = validate_subset("library", libraries, LIBRARIES)?;
    let patterns = validate_subset("pattern", patterns, PATTERNS)?;
    let styles = validate_subset("style", styles, STYLES)?;
    let languages = validate_subset("language", languages, LANGUAGES)?;

    let space = IdSpace::over(libraries, patterns, styles, languages);
    trace!(total = space.total(), max, "synthesizing identifier window");

    Ok(space.take(max).map(|t| identifier(&t)).collect())
}

/// Resolve requested values against a closed set, defaulting to the full set
fn validate_subset(
    axis: &str,
    requested: &[String],
    closed: &'static [&'static str],
) -> Result<Vec<&'static str>, CatalogError> {
    if requested.is_empty() {
        return Ok(closed.to_vec());
    }
    let mut values = Vec::with_capacity(requested.len());
    for value in requested {
        match closed.iter().find(|c| **c == value.as_str()) {
            Some(v) => values.push(*v),
            None => {
                return Err(CatalogError::NotFound(format!(
                    "unknown {axis} axis value '{value}'"
                )))
            }
        }
    }
    Ok(values)
}
