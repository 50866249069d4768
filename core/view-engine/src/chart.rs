//! FILENAME: core/view-engine/src/chart.rs
//! PURPOSE: Line/bar chart data extracted from the displayed rows.
//! CONTEXT: The x axis uses each row's display text; y values are numeric or
//! missing. Rendering is left to the front end.

use engine::{Dataset, Record};
use serde::{Deserialize, Serialize};

use crate::error::ViewError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub x: String,
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub x_column: String,
    pub y_column: String,
    /// Secondary series, drawn as bars.
    pub y2_column: Option<String>,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn build<'a>(
        dataset: &Dataset,
        rows: impl IntoIterator<Item = &'a Record>,
        x: &str,
        y: &str,
        y2: Option<&str>,
    ) -> Result<ChartSeries, ViewError> {
        let mut missing = Vec::new();
        let mut lookup = |name: &str| {
            let idx = dataset.column_index(name);
            if idx.is_none() {
                missing.push(name.to_string());
            }
            idx
        };
        let x_col = lookup(x);
        let y_col = lookup(y);
        let y2_col = y2.map(&mut lookup);

        let (x_col, y_col) = match (x_col, y_col, y2_col) {
            (Some(xc), Some(yc), None | Some(Some(_))) => (xc, yc),
            _ => return Err(ViewError::InvalidColumns { missing }),
        };
        let y2_col = y2_col.flatten();

        let points = rows
            .into_iter()
            .map(|record| ChartPoint {
                x: record.get(x_col).display_value(),
                y: record.get(y_col).as_f64(),
                y2: y2_col.and_then(|c| record.get(c).as_f64()),
            })
            .collect();

        Ok(ChartSeries {
            x_column: x.to_string(),
            y_column: y.to_string(),
            y2_column: y2.map(str::to_string),
            points,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest y value, ignoring missing points.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.y)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::CellValue;

    fn dataset() -> Dataset {
        Dataset::from_rows(
            vec!["date".into(), "close".into(), "volume".into()],
            vec![
                vec![CellValue::text("2024-01-01"), CellValue::Number(100.0), CellValue::Number(10.0)],
                vec![CellValue::text("2024-01-02"), CellValue::Empty, CellValue::Number(20.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn builds_points_with_missing_values() {
        let ds = dataset();
        let series = ChartSeries::build(&ds, ds.records(), "date", "close", Some("volume")).unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].y, Some(100.0));
        assert_eq!(series.points[1].y, None);
        assert_eq!(series.points[1].y2, Some(20.0));
        assert_eq!(series.y_range(), Some((100.0, 100.0)));
    }

    #[test]
    fn reports_all_unknown_columns() {
        let ds = dataset();
        let err = ChartSeries::build(&ds, ds.records(), "day", "close", Some("bars")).unwrap_err();
        assert_eq!(
            err,
            ViewError::InvalidColumns {
                missing: vec!["day".into(), "bars".into()]
            }
        );
    }
}
