//! Polygon merge for display
//!
//! Polygon and MultiPolygon geometries are kept in record order, everything else is
//! dropped. Zero survivors gives no result, a single survivor is returned as is, and two or
//! more become one MultiPolygon holding every polygon part.

use geo::{Geometry, MultiPolygon, Polygon};
use tracing::warn;

use super::{realize, to_wkt};
use crate::domain::GeometryRecord;

fn is_polygonal(geometry: &Geometry<f64>) -> bool {
    matches!(geometry, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
}

/// Merge already-parsed geometries
pub fn merge_polygons<I>(geometries: I) -> Option<Geometry<f64>>
where
    I: IntoIterator<Item = Geometry<f64>>,
{
    let mut polygonal: Vec<Geometry<f64>> = geometries.into_iter().filter(is_polygonal).collect();

    match polygonal.len() {
        0 => None,
        1 => polygonal.pop(),
        _ => {
            let parts: Vec<Polygon<f64>> = polygonal
                .into_iter()
                .flat_map(|g| match g {
                    Geometry::Polygon(p) => vec![p],
                    Geometry::MultiPolygon(mp) => mp.0,
                    _ => Vec::new(),
                })
                .collect();
            Some(Geometry::MultiPolygon(MultiPolygon::new(parts)))
        }
    }
}

/// Merge the polygonal records of a record sequence
pub fn merge_records(records: &[GeometryRecord]) -> Option<Geometry<f64>> {
    merge_polygons(realize(records))
}

/// WKT of the merged geometry (the text-area mirror)
pub fn merged_wkt(records: &[GeometryRecord]) -> Option<String> {
    let merged = merge_records(records);
    if merged.is_none() {
        warn!("no polygons or multipolygons to merge");
    }
    merged.as_ref().map(to_wkt)
}
