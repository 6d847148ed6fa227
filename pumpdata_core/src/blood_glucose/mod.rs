//! Blood glucose units, ranges and conversion.
//!
//! Glucose is stored in mmol/L. External documents may report mg/dL (or the
//! lowercase-l spellings of either unit); normalization converts those values
//! and rewrites the unit.

mod target;

pub use target::Target;

use crate::range::{range_for_unit, Quantity};
use crate::structure::Origin;

pub const MMOL_L: &str = "mmol/L";
pub const MMOL_L_ALIAS: &str = "mmol/l";
pub const MG_DL: &str = "mg/dL";
pub const MG_DL_ALIAS: &str = "mg/dl";

pub const MMOL_L_MINIMUM: f64 = 0.0;
pub const MMOL_L_MAXIMUM: f64 = 55.0;
pub const MG_DL_MINIMUM: f64 = 0.0;
pub const MG_DL_MAXIMUM: f64 = 1000.0;

pub const MMOL_L_TO_MG_DL_CONVERSION_FACTOR: f64 = 18.01559;

/// Converted values are rounded to five decimal places.
const MMOL_L_PRECISION_FACTOR: f64 = 100_000.0;

const EXTERNAL_UNITS: [&str; 4] = [MMOL_L, MMOL_L_ALIAS, MG_DL, MG_DL_ALIAS];
const CANONICAL_UNITS: [&str; 2] = [MMOL_L, MG_DL];

/// Unit spellings accepted from documents of the given origin.
///
/// Lowercase aliases are only tolerated on external input; anything already
/// inside the platform must use the canonical spelling.
pub fn units_for_origin(origin: Origin) -> &'static [&'static str] {
    match origin {
        Origin::External => &EXTERNAL_UNITS,
        Origin::Internal | Origin::Store => &CANONICAL_UNITS,
    }
}

pub fn is_mmol_l(units: Option<&str>) -> bool {
    matches!(units, Some(MMOL_L | MMOL_L_ALIAS))
}

pub fn is_mg_dl(units: Option<&str>) -> bool {
    matches!(units, Some(MG_DL | MG_DL_ALIAS))
}

/// Canonical spelling of a recognized glucose unit.
pub fn canonical_units(units: Option<&str>) -> Option<&'static str> {
    if is_mmol_l(units) {
        Some(MMOL_L)
    } else if is_mg_dl(units) {
        Some(MG_DL)
    } else {
        None
    }
}

/// Storage unit for a reported unit: every recognized glucose unit becomes
/// mmol/L. Unrecognized units are left as they are.
pub fn normalize_units(units: Option<&str>) -> Option<String> {
    match canonical_units(units) {
        Some(_) => Some(MMOL_L.to_string()),
        None => units.map(str::to_string),
    }
}

/// Value expressed in the storage unit.
///
/// mg/dL values are divided by [`MMOL_L_TO_MG_DL_CONVERSION_FACTOR`] and
/// rounded; mmol/L and unrecognized units pass through unchanged.
pub fn normalize_value_for_units(value: Option<f64>, units: Option<&str>) -> Option<f64> {
    let value = value?;
    if is_mg_dl(units) {
        let converted = value / MMOL_L_TO_MG_DL_CONVERSION_FACTOR;
        Some((converted * MMOL_L_PRECISION_FACTOR).round() / MMOL_L_PRECISION_FACTOR)
    } else {
        Some(value)
    }
}

/// Rewrite `value` in place into the storage unit.
pub(crate) fn normalize_in_place(value: &mut Option<f64>, units: Option<&str>) {
    let normalized = normalize_value_for_units(*value, units);
    if normalized != *value {
        tracing::trace!(before = ?value, after = ?normalized, units = ?units, "converted glucose value");
        *value = normalized;
    }
}

/// Legal range for a glucose value reported in `units`.
pub fn value_range_for_units(units: Option<&str>) -> (f64, f64) {
    range_for_unit(Quantity::GlucoseValue, units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_for_origin() {
        assert_eq!(units_for_origin(Origin::External).len(), 4);
        assert_eq!(units_for_origin(Origin::Internal), &["mmol/L", "mg/dL"]);
        assert_eq!(units_for_origin(Origin::Store), &["mmol/L", "mg/dL"]);
    }

    #[test]
    fn test_canonical_units() {
        assert_eq!(canonical_units(Some("mmol/l")), Some("mmol/L"));
        assert_eq!(canonical_units(Some("mg/dl")), Some("mg/dL"));
        assert_eq!(canonical_units(Some("mg/dL")), Some("mg/dL"));
        assert_eq!(canonical_units(Some("mmol")), None);
        assert_eq!(canonical_units(None), None);
    }

    #[test]
    fn test_normalize_units() {
        assert_eq!(normalize_units(Some("mmol/l")).as_deref(), Some("mmol/L"));
        assert_eq!(normalize_units(Some("mg/dL")).as_deref(), Some("mmol/L"));
        assert_eq!(normalize_units(Some("mg/dl")).as_deref(), Some("mmol/L"));
        assert_eq!(normalize_units(Some("other")).as_deref(), Some("other"));
        assert_eq!(normalize_units(None), None);
    }

    #[test]
    fn test_normalize_value_for_units() {
        assert_eq!(normalize_value_for_units(Some(70.0), Some("mg/dL")), Some(3.88552));
        assert_eq!(normalize_value_for_units(Some(180.0), Some("mg/dl")), Some(9.99135));
        assert_eq!(normalize_value_for_units(Some(5.5), Some("mmol/L")), Some(5.5));
        assert_eq!(normalize_value_for_units(Some(5.5), Some("mmol/l")), Some(5.5));
        assert_eq!(normalize_value_for_units(Some(120.0), None), Some(120.0));
        assert_eq!(normalize_value_for_units(None, Some("mg/dL")), None);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut value = Some(100.0);
        let mut units = Some("mg/dL".to_string());
        normalize_in_place(&mut value, units.as_deref());
        units = normalize_units(units.as_deref());
        let once = (value, units.clone());

        normalize_in_place(&mut value, units.as_deref());
        units = normalize_units(units.as_deref());
        assert_eq!((value, units), once);
    }

    #[test]
    fn test_value_range_for_units() {
        assert_eq!(value_range_for_units(Some("mmol/L")), (0.0, 55.0));
        assert_eq!(value_range_for_units(Some("mg/dL")), (0.0, 1000.0));
        assert_eq!(value_range_for_units(None), crate::range::UNBOUNDED);
    }
}
