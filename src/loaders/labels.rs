use std::path::Path;

use super::{has_extension, read_text};
use crate::error::LoadError;
use crate::types::Label;

const TEXT_FIELDS: usize = 9;

/// Parses a JSON array of label records
pub fn parse_labels_json(text: &str, path: &Path) -> Result<Vec<Label>, LoadError> {
    let labels: Vec<Label> = serde_json::from_str(text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    // f32 fields saturate to infinity on out-of-range JSON numbers
    for (index, label) in labels.iter().enumerate() {
        if let Some(field) = label.non_finite_field() {
            return Err(LoadError::malformed(
                path,
                format!("record {}: {} is not finite", index, field),
            ));
        }
    }
    Ok(labels)
}

/// Parses the annotation tool's text export, one label per line:
/// `id;center_x;center_y;based_z;size_x;size_y;size_z;yaw_angle;class`
pub fn parse_labels_text(text: &str, path: &Path) -> Result<Vec<Label>, LoadError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(line.trim(), index + 1, path))
        .collect()
}

fn parse_line(line: &str, line_number: usize, path: &Path) -> Result<Label, LoadError> {
    let fields: Vec<&str> = line.split(';').map(str::trim).collect();
    if fields.len() != TEXT_FIELDS {
        return Err(LoadError::malformed(
            path,
            format!(
                "line {}: expected {} fields, found {}",
                line_number,
                TEXT_FIELDS,
                fields.len()
            ),
        ));
    }

    let number = |column: usize| -> Result<f32, LoadError> {
        match fields[column].parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(LoadError::malformed(
                path,
                format!(
                    "line {}: field {} is not a finite number: {:?}",
                    line_number,
                    column + 1,
                    fields[column]
                ),
            )),
        }
    };

    Ok(Label {
        id: fields[0].to_string(),
        center_x: number(1)?,
        center_y: number(2)?,
        based_z: number(3)?,
        size_x: number(4)?,
        size_y: number(5)?,
        size_z: number(6)?,
        yaw_angle: number(7)?,
        object_class: fields[8].to_string(),
    })
}

/// Loads a `.json` label file, or the raw `.txt` export
pub fn load_labels(path: impl AsRef<Path>) -> Result<Vec<Label>, LoadError> {
    let path = path.as_ref();
    let text = read_text(path)?;
    if has_extension(path, "txt") {
        parse_labels_text(&text, path)
    } else {
        parse_labels_json(&text, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "id": "3", "center_x": 12.5, "center_y": -3.0, "based_z": -1.7,
        "size_x": 4.2, "size_y": 1.8, "size_z": 1.5, "yaw_angle": 0.1,
        "object_class": "CAR"
    }"#;

    #[test]
    fn parses_json_records() {
        let labels = parse_labels_json(&format!("[{RECORD}]"), Path::new("label0000.txt.json")).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].id, "3");
        assert_eq!(labels[0].size_x, 4.2);
        assert_eq!(labels[0].object_class, "CAR");
    }

    #[test]
    fn json_with_missing_field_is_rejected() {
        let text = r#"[{ "id": "3", "center_x": 1.0 }]"#;
        assert!(matches!(
            parse_labels_json(text, Path::new("l.json")),
            Err(LoadError::Json { .. })
        ));
    }

    #[test]
    fn parses_text_export() {
        let text = "1;10.0;-2.0;-1.5;4.0;2.0;1.5;0.3;CAR\n\n2; 5; 5; -1; 0.8; 0.8; 1.8; 0; PED\n";
        let labels = parse_labels_text(text, Path::new("label0000.txt")).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].yaw_angle, 0.3);
        assert_eq!(labels[1].id, "2");
        assert_eq!(labels[1].object_class, "PED");
        assert_eq!(labels[1].size_z, 1.8);
    }

    #[test]
    fn text_errors_name_the_line() {
        let text = "1;10.0;-2.0;-1.5;4.0;2.0;1.5;0.3;CAR\n2;x;0;0;1;1;1;0;PED\n";
        let err = parse_labels_text(text, Path::new("label0000.txt")).unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let err = parse_labels_text("1;2;3\n", Path::new("label0000.txt")).unwrap_err();
        assert!(err.to_string().contains("expected 9 fields"));
    }

    #[test]
    fn text_rejects_non_finite() {
        for line in ["1;NaN;0;0;1;1;1;0;CAR", "1;0;0;0;inf;1;1;0;CAR", "1;0;0;0;1;1;1;-inf;CAR"] {
            let err = parse_labels_text(line, Path::new("label0000.txt")).unwrap_err();
            assert!(matches!(err, LoadError::Malformed { .. }));
            assert!(err.to_string().contains("line 1"));
        }
    }

    #[test]
    fn json_rejects_overflowing_numbers() {
        let text = r#"[{ "id": "3", "center_x": 1e300, "center_y": 0, "based_z": 0,
            "size_x": 1, "size_y": 1, "size_z": 1, "yaw_angle": 0, "object_class": "CAR" }]"#;
        let err = parse_labels_json(text, Path::new("l.json")).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
        assert!(err.to_string().contains("center_x"));
    }
}
