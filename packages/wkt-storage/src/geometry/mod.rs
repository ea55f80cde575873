//! Read-side geometry helpers
//!
//! Parsing/validation of WKT, the polygon merge used for the text-area mirror, and the
//! extent used to fit the view. None of these touch the store.

mod merge;

pub use merge::{merge_polygons, merge_records, merged_wkt};

use geo::{BoundingRect, Coord, Geometry, Rect};
use tracing::warn;
use wkt::{ToWkt, TryFromWkt};

use crate::domain::GeometryRecord;
use crate::{Result, StorageError};

/// Parse WKT into a geometry
///
/// Empty or whitespace-only text is rejected the same way as unparsable text.
///
/// # Examples
///
/// ```rust
/// use wkt_storage::geometry::parse_wkt;
///
/// assert!(parse_wkt("POINT(1 2)").is_ok());
/// assert!(parse_wkt("").is_err());
/// assert!(parse_wkt("POLYGON A").is_err());
/// ```
pub fn parse_wkt(text: &str) -> Result<Geometry<f64>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StorageError::geometry("Empty WKT"));
    }
    Geometry::<f64>::try_from_wkt_str(trimmed)
        .map_err(|e| StorageError::geometry(format!("Invalid WKT: {}", e)))
}

/// Render a geometry back to WKT
pub fn to_wkt(geometry: &Geometry<f64>) -> String {
    geometry.wkt_string()
}

/// Parse every record, skipping (and logging) the ones that fail
pub fn realize(records: &[GeometryRecord]) -> Vec<Geometry<f64>> {
    records
        .iter()
        .filter_map(|record| match parse_wkt(&record.wkt) {
            Ok(geometry) => Some(geometry),
            Err(e) => {
                warn!(id = %record.id, error = %e, "skipping unreadable record");
                None
            }
        })
        .collect()
}

/// Bounding rectangle of every readable record, `None` when nothing has an extent
pub fn extent(records: &[GeometryRecord]) -> Option<Rect<f64>> {
    realize(records)
        .iter()
        .filter_map(|g| g.bounding_rect())
        .reduce(|acc, rect| {
            Rect::new(
                Coord {
                    x: acc.min().x.min(rect.min().x),
                    y: acc.min().y.min(rect.min().y),
                },
                Coord {
                    x: acc.max().x.max(rect.max().x),
                    y: acc.max().y.max(rect.max().y),
                },
            )
        })
}
