use crate::domain::Series;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

pub fn format_fixed_f64(value: f64, width: usize, precision: usize) -> String {
    format!(
        "{value:>width$.precision$}",
        width = width,
        precision = precision
    )
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

/// Two fixed-width columns: scan position and normalised counts.
pub fn render_series_table(series: &Series, x_label: &str) -> String {
    let mut rendered = format!("# {:>14} {:>12}\n", x_label, "counts");
    for (position, counts) in series.points() {
        rendered.push_str(&format!(
            "  {} {:>12}\n",
            format_fixed_f64(position, 14, 6),
            counts
        ));
    }
    rendered
}

pub fn write_text_artifact(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, normalize_text_artifact(content))
}

pub fn write_json_artifact<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    write_text_artifact(path, &rendered)
}

#[cfg(test)]
mod tests {
    use super::{
        normalize_text_artifact, render_series_table, write_json_artifact, write_text_artifact,
    };
    use crate::domain::Series;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn normalize_text_artifact_uses_canonical_line_endings() {
        let normalized = normalize_text_artifact("alpha\r\nbeta\rgamma");
        assert_eq!(normalized, "alpha\nbeta\ngamma\n");
    }

    #[test]
    fn series_table_has_one_row_per_point() {
        let series = Series::from_corrected(vec![20.0, 20.5], vec![6497, 3248]);
        let rendered = render_series_table(&series, "stt");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "#            stt       counts");
        assert_eq!(lines[1], "       20.000000         6497");
        assert_eq!(lines[2], "       20.500000         3248");
    }

    #[test]
    fn repeated_text_writes_produce_identical_bytes() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("nested/series.dat");
        let input = "line 1\r\nline 2\rline 3";

        write_text_artifact(&path, input).expect("first write should succeed");
        let first = fs::read(&path).expect("artifact should be readable");

        write_text_artifact(&path, input).expect("second write should succeed");
        let second = fs::read(&path).expect("artifact should be readable");

        assert_eq!(first, second);
        assert_eq!(second, b"line 1\nline 2\nline 3\n");
    }

    #[test]
    fn json_artifact_is_newline_terminated() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("series.json");
        let series = Series::from_corrected(vec![1.0], vec![2]);

        write_json_artifact(&path, &series).expect("json write should succeed");
        let content = fs::read_to_string(&path).expect("artifact should be readable");
        assert!(content.ends_with("}\n"));
        let parsed: serde_json::Value = serde_json::from_str(&content).expect("json should parse");
        assert_eq!(parsed["xData"][0], 1.0);
    }
}
