use crate::core::models::frame::BoxExtent;
use nalgebra::Point3;

/// Converts fractional coordinates into absolute coordinates within `extent`.
///
/// Each axis maps as `abs = frac * (hi - lo) + lo`. There are no error conditions;
/// NaN bounds propagate into the result.
pub fn box_extent_to_absolute(fractional: &Point3<f64>, extent: &BoxExtent) -> Point3<f64> {
    extent.origin() + fractional.coords.component_mul(&extent.lengths())
}

/// Inverse of [`box_extent_to_absolute`].
///
/// A degenerate axis (`hi == lo`) yields a non-finite component.
pub fn absolute_to_fractional(absolute: &Point3<f64>, extent: &BoxExtent) -> Point3<f64> {
    Point3::from((absolute - extent.origin()).component_div(&extent.lengths()))
}
