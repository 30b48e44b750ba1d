//! Manifest loading
//!
//! Two shapes are accepted:
//!
//! ```json
//! {"input_file": "movie.mp4", "output_clips": [{"start_time": 0, "length": 34}]}
//! ```
//!
//! and the older bare array `[{"start_time": 0, "length": 34, "rename_to": "intro"}]`,
//! which needs the source file from the command line. YAML files use the same shapes.
//! CSV files carry one clip per row under a `start_time,length,rename_to` header
//! and, like the bare array, take the source from the command line.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::domain::model::{ClipLength, TimeSpec};
use crate::error::{SplicerError, SplicerResult};
use crate::utils::path::is_plain_file_name;

/// Serialization of a manifest file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
    Csv,
}

impl ManifestFormat {
    /// `.yaml`/`.yml` are YAML, `.csv` is CSV, everything else is read as JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => ManifestFormat::Yaml,
            Some("csv") => ManifestFormat::Csv,
            _ => ManifestFormat::Json,
        }
    }
}

/// One requested clip before it is checked against the source
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub start_time: f64,
    pub length: ClipLength,
    pub name: Option<String>,
}

/// Parsed manifest
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    /// Absent for the bare array form
    pub input_file: Option<PathBuf>,
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimeValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawClip {
    start_time: TimeValue,
    #[serde(default)]
    length: Option<TimeValue>,
    #[serde(default)]
    end_time: Option<TimeValue>,
    #[serde(default)]
    rename_to: Option<String>,
}

/// CSV row; empty cells read as absent
#[derive(Debug, Deserialize)]
struct CsvClip {
    start_time: String,
    #[serde(default)]
    length: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
    #[serde(default)]
    rename_to: Option<String>,
}

impl From<CsvClip> for RawClip {
    fn from(row: CsvClip) -> Self {
        RawClip {
            start_time: TimeValue::Text(row.start_time),
            length: row.length.map(TimeValue::Text),
            end_time: row.end_time.map(TimeValue::Text),
            rename_to: row.rename_to,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ManifestDocument {
    #[serde(default)]
    input_file: Option<String>,
    output_clips: Vec<RawClip>,
}

/// Read and parse a manifest file
pub fn load_manifest(path: &Path) -> SplicerResult<Manifest> {
    let text = std::fs::read_to_string(path).map_err(|e| SplicerError::ManifestValidation {
        path: path.display().to_string(),
        message: format!("cannot read file: {}", e),
    })?;
    parse_manifest(&text, ManifestFormat::from_path(path), &path.display().to_string())
}

/// Parse manifest text; `origin` names the manifest in error messages
pub fn parse_manifest(text: &str, format: ManifestFormat, origin: &str) -> SplicerResult<Manifest> {
    let invalid = |message: String| SplicerError::ManifestValidation {
        path: origin.to_string(),
        message,
    };

    let value: Value = match format {
        ManifestFormat::Json => serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?,
        ManifestFormat::Yaml => serde_yaml::from_str(text).map_err(|e| invalid(e.to_string()))?,
        ManifestFormat::Csv => {
            let clips = read_csv_clips(text).map_err(&invalid)?;
            return build_manifest(None, clips, &invalid);
        }
    };

    let (input_file, raw_clips) = match value {
        Value::Object(_) => {
            let document: ManifestDocument =
                serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
            (document.input_file, document.output_clips)
        }
        Value::Array(_) => {
            let clips: Vec<RawClip> =
                serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
            (None, clips)
        }
        _ => {
            return Err(invalid(
                "expected an object with input_file and output_clips, or an array of clips"
                    .to_string(),
            ))
        }
    };

    build_manifest(input_file, raw_clips, &invalid)
}

fn build_manifest(
    input_file: Option<String>,
    raw_clips: Vec<RawClip>,
    invalid: &dyn Fn(String) -> SplicerError,
) -> SplicerResult<Manifest> {
    if let Some(file) = &input_file {
        if file.trim().is_empty() {
            return Err(invalid("input_file is empty".to_string()));
        }
    }

    let entries = raw_clips
        .into_iter()
        .enumerate()
        .map(|(index, raw)| convert_clip(index, raw).map_err(invalid))
        .collect::<SplicerResult<Vec<_>>>()?;

    Ok(Manifest {
        input_file: input_file.map(PathBuf::from),
        entries,
    })
}

fn read_csv_clips(text: &str) -> Result<Vec<RawClip>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .deserialize::<CsvClip>()
        .enumerate()
        .map(|(row, result)| {
            result
                .map(RawClip::from)
                .map_err(|e| format!("row {}: {}", row + 1, e))
        })
        .collect()
}

fn convert_clip(index: usize, raw: RawClip) -> Result<ManifestEntry, String> {
    let start_time = seconds_of(&raw.start_time)
        .map_err(|e| format!("output_clips[{}].start_time: {}", index, e))?;
    if start_time < 0.0 {
        return Err(format!(
            "output_clips[{}].start_time must not be negative, got {}",
            index, start_time
        ));
    }

    let length = match (&raw.length, &raw.end_time) {
        (Some(TimeValue::Text(text)), _) if text.trim().eq_ignore_ascii_case("end") => {
            ClipLength::ToEnd
        }
        (Some(length), _) => ClipLength::Seconds(
            seconds_of(length).map_err(|e| format!("output_clips[{}].length: {}", index, e))?,
        ),
        (None, Some(end)) => {
            let end = seconds_of(end)
                .map_err(|e| format!("output_clips[{}].end_time: {}", index, e))?;
            ClipLength::Seconds(end - start_time)
        }
        (None, None) => return Err(format!("output_clips[{}]: missing field `length`", index)),
    };

    if let ClipLength::Seconds(seconds) = length {
        if seconds <= 0.0 {
            return Err(format!(
                "output_clips[{}] must have a positive length, got {}",
                index, seconds
            ));
        }
    }

    let name = raw
        .rename_to
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    if let Some(name) = &name {
        if !is_plain_file_name(name) {
            return Err(format!(
                "output_clips[{}].rename_to '{}' must be a file name without directories",
                index, name
            ));
        }
    }

    Ok(ManifestEntry {
        start_time,
        length,
        name,
    })
}

fn seconds_of(value: &TimeValue) -> Result<f64, String> {
    match value {
        TimeValue::Number(seconds) if seconds.is_finite() => Ok(*seconds),
        TimeValue::Number(seconds) => Err(format!("{} is not a finite number", seconds)),
        TimeValue::Text(text) => TimeSpec::parse(text).map(|spec| spec.seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(text: &str) -> SplicerResult<Manifest> {
        parse_manifest(text, ManifestFormat::Json, "manifest.json")
    }

    #[test]
    fn test_document_form() {
        let manifest = json(
            r#"{"input_file": "movie.mp4", "output_clips": [
                {"start_time": 0, "length": 34},
                {"start_time": 35, "length": 22}
            ]}"#,
        )
        .unwrap();

        assert_eq!(manifest.input_file, Some(PathBuf::from("movie.mp4")));
        assert_eq!(manifest.entries.len(), 2);
        assert_eq!(manifest.entries[1].start_time, 35.0);
        assert_eq!(manifest.entries[1].length, ClipLength::Seconds(22.0));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let manifest = json(
            r#"{"input_file": "a.mp4", "author": "x",
                "output_clips": [{"start_time": 1, "length": 2, "note": "keep"}]}"#,
        )
        .unwrap();
        assert_eq!(manifest.entries.len(), 1);
    }

    #[test]
    fn test_missing_output_clips() {
        let err = json(r#"{"input_file": "a.mp4"}"#).unwrap_err();
        match err {
            SplicerError::ManifestValidation { message, .. } => {
                assert!(message.contains("output_clips"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_length() {
        let err = json(r#"{"input_file": "a.mp4", "output_clips": [{"start_time": 1}]}"#)
            .unwrap_err();
        assert!(matches!(err, SplicerError::ManifestValidation { .. }));
        assert!(err.to_string().contains("output_clips[0]"));
    }

    #[test]
    fn test_length_to_end_and_timestamps() {
        let manifest = json(
            r#"{"input_file": "a.mp4", "output_clips": [
                {"start_time": "1:30", "length": "end"},
                {"start_time": "0:00:10.5", "length": "00:05"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(manifest.entries[0].start_time, 90.0);
        assert_eq!(manifest.entries[0].length, ClipLength::ToEnd);
        assert_eq!(manifest.entries[1].start_time, 10.5);
        assert_eq!(manifest.entries[1].length, ClipLength::Seconds(5.0));
    }

    #[test]
    fn test_legacy_array_form() {
        let manifest = json(
            r#"[{"start_time": 0, "length": 10, "rename_to": "intro"},
                {"start_time": 10, "end_time": 25}]"#,
        )
        .unwrap();
        assert!(manifest.input_file.is_none());
        assert_eq!(manifest.entries[0].name.as_deref(), Some("intro"));
        assert_eq!(manifest.entries[1].length, ClipLength::Seconds(15.0));
    }

    #[test]
    fn test_rename_to_stays_inside_output_dir() {
        for name in ["/abs/x", "../x", "sub/x", ".."] {
            let text = format!(r#"[{{"start_time": 0, "length": 5, "rename_to": "{}"}}]"#, name);
            let err = json(&text).unwrap_err();
            assert!(
                matches!(err, SplicerError::ManifestValidation { .. }),
                "{} was accepted",
                name
            );
            assert!(err.to_string().contains("rename_to"));
        }
    }

    #[test]
    fn test_rejects_negative_and_zero() {
        assert!(json(r#"[{"start_time": -1, "length": 10}]"#).is_err());
        assert!(json(r#"[{"start_time": 0, "length": 0}]"#).is_err());
        assert!(json(r#"[{"start_time": 5, "end_time": 5}]"#).is_err());
    }

    #[test]
    fn test_rejects_scalar_and_garbage() {
        assert!(json("42").is_err());
        assert!(json("{not json").is_err());
    }

    #[test]
    fn test_yaml_manifest() {
        let manifest = parse_manifest(
            "input_file: movie.mkv\noutput_clips:\n  - start_time: 0\n    length: 5\n",
            ManifestFormat::Yaml,
            "clips.yaml",
        )
        .unwrap();
        assert_eq!(manifest.input_file, Some(PathBuf::from("movie.mkv")));
        assert_eq!(manifest.entries[0].length, ClipLength::Seconds(5.0));
    }

    #[test]
    fn test_csv_manifest() {
        let manifest = parse_manifest(
            "start_time, length, rename_to\n0, 34, intro\n35, 22,\n1:00, end, outro\n",
            ManifestFormat::Csv,
            "clips.csv",
        )
        .unwrap();

        assert!(manifest.input_file.is_none());
        assert_eq!(manifest.entries.len(), 3);
        assert_eq!(manifest.entries[0].name.as_deref(), Some("intro"));
        assert_eq!(manifest.entries[1].start_time, 35.0);
        assert_eq!(manifest.entries[1].length, ClipLength::Seconds(22.0));
        assert!(manifest.entries[1].name.is_none());
        assert_eq!(manifest.entries[2].start_time, 60.0);
        assert_eq!(manifest.entries[2].length, ClipLength::ToEnd);
    }

    #[test]
    fn test_csv_columns_in_any_order() {
        let manifest = parse_manifest(
            "rename_to,end_time,start_time\npart,25,10\n",
            ManifestFormat::Csv,
            "clips.csv",
        )
        .unwrap();
        assert_eq!(manifest.entries[0].length, ClipLength::Seconds(15.0));
        assert_eq!(manifest.entries[0].name.as_deref(), Some("part"));
    }

    #[test]
    fn test_csv_row_missing_length() {
        let err = parse_manifest(
            "start_time,length\n0,10\n5,\n",
            ManifestFormat::Csv,
            "clips.csv",
        )
        .unwrap_err();
        assert!(matches!(err, SplicerError::ManifestValidation { .. }));
        assert!(err.to_string().contains("output_clips[1]"));
    }

    #[test]
    fn test_csv_without_start_column() {
        let err = parse_manifest("length\n10\n", ManifestFormat::Csv, "clips.csv").unwrap_err();
        assert!(err.to_string().contains("start_time"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ManifestFormat::from_path(Path::new("a.csv")), ManifestFormat::Csv);
        assert_eq!(ManifestFormat::from_path(Path::new("a.YML")), ManifestFormat::Yaml);
        assert_eq!(ManifestFormat::from_path(Path::new("a.json")), ManifestFormat::Json);
        assert_eq!(ManifestFormat::from_path(Path::new("a")), ManifestFormat::Json);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_manifest(Path::new("/nonexistent/manifest.json")).unwrap_err();
        assert!(matches!(err, SplicerError::ManifestValidation { .. }));
    }
}
