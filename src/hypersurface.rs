use crate::error::ScriptError;
use ndarray::Array2;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Default relative tolerance for hypersurface comparisons.
pub const RTOL: f64 = 1e-5;
/// Default absolute tolerance for hypersurface comparisons.
pub const ATOL: f64 = 1e-8;

/// Renders a hypersurface as a whitespace-separated text matrix.
///
/// One offset-grid row per line, values in scientific notation, preceded
/// by a `#` comment header naming the inputs and the grid shape. The
/// format parses with any reader that skips `#` lines, including numpy's
/// `loadtxt`.
pub fn render_hypersurface(surface: &Array2<f64>, base: &Path, sub: &Path) -> String {
    let (rows, cols) = surface.dim();
    let mut out = String::new();
    let _ = writeln!(out, "# Mutual information hypersurface (nats)");
    let _ = writeln!(
        out,
        "# base: {}  sub: {}",
        base.display(),
        sub.display()
    );
    let _ = writeln!(out, "# {} rows (dy) x {} cols (dx)", rows, cols);

    for row in surface.rows() {
        let mut first = true;
        for &value in row {
            if !first {
                out.push(' ');
            }
            let _ = write!(out, "{:.18e}", value);
            first = false;
        }
        out.push('\n');
    }
    out
}

/// Reads a hypersurface file written by `render_hypersurface`.
pub fn read_hypersurface(path: &Path) -> Result<Array2<f64>, ScriptError> {
    let text = fs::read_to_string(path)?;
    parse_hypersurface(&text)
}

/// Parses a whitespace-separated text matrix, skipping `#` comment lines
/// and blank lines.
///
/// # Errors
///
/// Returns `ScriptError::MalformedHypersurface` on an unparsable value,
/// ragged rows, or an empty matrix.
pub fn parse_hypersurface(text: &str) -> Result<Array2<f64>, ScriptError> {
    let mut values: Vec<f64> = Vec::new();
    let mut rows = 0usize;
    let mut cols: Option<usize> = None;

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut row_len = 0usize;
        for token in line.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| {
                ScriptError::MalformedHypersurface(format!(
                    "line {}: cannot parse '{}' as a number",
                    lineno + 1,
                    token
                ))
            })?;
            values.push(value);
            row_len += 1;
        }

        match cols {
            None => cols = Some(row_len),
            Some(expected) if expected != row_len => {
                return Err(ScriptError::MalformedHypersurface(format!(
                    "line {}: expected {} columns, found {}",
                    lineno + 1,
                    expected,
                    row_len
                )));
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let cols = cols.ok_or_else(|| {
        ScriptError::MalformedHypersurface("no data rows found".to_string())
    })?;
    Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| ScriptError::MalformedHypersurface(e.to_string()))
}

/// Checks two hypersurfaces for elementwise equality within tolerances:
/// `|a - b| <= atol + rtol * |b|`. NaN entries never compare equal.
pub fn hypersurface_allclose(
    current: &Array2<f64>,
    reference: &Array2<f64>,
    rtol: f64,
    atol: f64,
) -> bool {
    if current.dim() != reference.dim() {
        return false;
    }
    current
        .iter()
        .zip(reference.iter())
        .all(|(&a, &b)| (a - b).abs() <= atol + rtol * b.abs())
}
