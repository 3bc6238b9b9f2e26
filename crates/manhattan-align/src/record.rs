use std::io::{BufRead, Write};

use manhattan_3d::linalg::transpose33;

/// Errors produced while reading or writing a [`TransformRecord`].
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Failed to read or write the record.
    #[error("failed to read or write the transform record")]
    Io(#[from] std::io::Error),

    /// A data line does not hold three space-separated numbers.
    #[error("malformed transform record line: {0:?}")]
    MalformedLine(String),

    /// Fewer data lines than the four the format requires.
    #[error("transform record is truncated: expected 4 data lines, found {0}")]
    Truncated(usize),
}

/// Persisted rotation and centroid of one alignment.
///
/// The on-disk form is a flat text record consumers re-load to reproduce the
/// exact transform without recomputing PCA: three lines holding the rows of
/// the **transpose** of the rotation (the matrix applied as
/// `aligned = (point - centroid) @ R^T + centroid` in row-vector convention),
/// then one line with the centroid, all at fixed 8-decimal precision.
/// Lines starting with `#` are comments.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRecord {
    /// Rotation whose rows are the world axes expressed in the input frame.
    pub rotation: [[f64; 3]; 3],
    /// Pivot the rotation was applied about.
    pub centroid: [f64; 3],
}

impl TransformRecord {
    /// Write the record in its on-disk text form.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), RecordError> {
        let stored = transpose33(&self.rotation);
        writeln!(
            writer,
            "# Rotation matrix (R.T, for transforming points: aligned = (original - centroid) @ R.T + centroid)"
        )?;
        for row in &stored {
            writeln!(writer, "{:.8} {:.8} {:.8}", row[0], row[1], row[2])?;
        }
        writeln!(writer, "# Centroid")?;
        writeln!(
            writer,
            "{:.8} {:.8} {:.8}",
            self.centroid[0], self.centroid[1], self.centroid[2]
        )?;
        Ok(())
    }

    /// Parse a record from its on-disk text form.
    ///
    /// Comment lines (`#`) and blank lines are skipped; the first three data
    /// lines are the stored matrix (the transpose of the rotation), the
    /// fourth is the centroid.
    pub fn read<R: BufRead>(reader: R) -> Result<Self, RecordError> {
        let mut rows: Vec<[f64; 3]> = Vec::with_capacity(4);
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let values = trimmed
                .split_whitespace()
                .map(|token| token.parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| RecordError::MalformedLine(trimmed.to_string()))?;
            if values.len() != 3 {
                return Err(RecordError::MalformedLine(trimmed.to_string()));
            }

            rows.push([values[0], values[1], values[2]]);
            if rows.len() == 4 {
                break;
            }
        }

        if rows.len() < 4 {
            return Err(RecordError::Truncated(rows.len()));
        }

        let stored = [rows[0], rows[1], rows[2]];
        Ok(Self {
            rotation: transpose33(&stored),
            centroid: rows[3],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use manhattan_3d::transforms::axis_angle_to_rotation_matrix;

    #[test]
    fn test_roundtrip() {
        let record = TransformRecord {
            rotation: axis_angle_to_rotation_matrix(&[0.0, 0.0, 1.0], 0.5).unwrap(),
            centroid: [1.25, -2.5, 3.75],
        };

        let mut buffer = Vec::new();
        record.write(&mut buffer).unwrap();

        let parsed = TransformRecord::read(buffer.as_slice()).unwrap();
        for (row, expected_row) in parsed.rotation.iter().zip(record.rotation.iter()) {
            for (val, exp) in row.iter().zip(expected_row.iter()) {
                assert_relative_eq!(val, exp, epsilon = 1e-7);
            }
        }
        assert_eq!(parsed.centroid, record.centroid);
    }

    #[test]
    fn test_on_disk_layout() {
        let record = TransformRecord {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            centroid: [0.0, 0.0, 0.5],
        };

        let mut buffer = Vec::new();
        record.write(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with('#'));
        assert_eq!(lines[1], "1.00000000 0.00000000 0.00000000");
        assert!(lines[4].starts_with('#'));
        assert_eq!(lines[5], "0.00000000 0.00000000 0.50000000");
    }

    #[test]
    fn test_stored_matrix_is_the_transpose() {
        // rotation rows are axes; the file stores columns-as-rows
        let rotation = [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let record = TransformRecord {
            rotation,
            centroid: [0.0; 3],
        };

        let mut buffer = Vec::new();
        record.write(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[1], "0.00000000 -1.00000000 0.00000000");
        assert_eq!(lines[2], "1.00000000 0.00000000 0.00000000");
    }

    #[test]
    fn test_truncated_record() {
        let text = "# Rotation\n1.0 0.0 0.0\n0.0 1.0 0.0\n";
        assert!(matches!(
            TransformRecord::read(text.as_bytes()),
            Err(RecordError::Truncated(2))
        ));
    }

    #[test]
    fn test_malformed_line() {
        let text = "1.0 0.0 0.0\n0.0 banana 0.0\n0.0 0.0 1.0\n0.0 0.0 0.0\n";
        assert!(matches!(
            TransformRecord::read(text.as_bytes()),
            Err(RecordError::MalformedLine(_))
        ));

        let short = "1.0 0.0\n";
        assert!(matches!(
            TransformRecord::read(short.as_bytes()),
            Err(RecordError::MalformedLine(_))
        ));
    }
}
