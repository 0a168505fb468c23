//! Worked-time models.
//!
//! [`RawWorkEntry`] is one service line as it arrives from an EVV export;
//! [`WorkRecord`] is the per-(client, staff) aggregate the allocation
//! engine consumes.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single service line from an Electronic Visit Verification export.
///
/// Numeric cells are kept as text because exports routinely carry blanks,
/// placeholders and stray strings; they are interpreted during aggregation.
///
/// # Example
///
/// ```
/// use payroll_reconciler::models::RawWorkEntry;
///
/// let entry: RawWorkEntry = serde_json::from_str(
///     r#"{"client": "Jane Doe", "staff": "Sam Lee", "duration": 3.5, "units": "14"}"#,
/// ).unwrap();
/// assert_eq!(entry.duration.as_deref(), Some("3.5"));
/// assert_eq!(entry.units.as_deref(), Some("14"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWorkEntry {
    /// Client name or identifier as it appears in the export.
    pub client: String,
    /// Staff name or identifier as it appears in the export.
    pub staff: String,
    /// Service duration in hours.
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub duration: Option<String>,
    /// Billing units for the service line.
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub units: Option<String>,
}

impl RawWorkEntry {
    /// Creates an entry with a numeric duration and no unit count.
    pub fn new(client: impl Into<String>, staff: impl Into<String>, duration: Decimal) -> Self {
        Self {
            client: client.into(),
            staff: staff.into(),
            duration: Some(duration.to_string()),
            units: None,
        }
    }

    /// Sets the unit count for the entry.
    pub fn with_units(mut self, units: u64) -> Self {
        self.units = Some(units.to_string());
        self
    }
}

/// Worked time for one (client, staff) pair in one reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRecord {
    /// The client the time was worked for.
    pub client_id: String,
    /// The staff member who worked it.
    pub staff_id: String,
    /// Total hours worked, rounded to 2 decimals.
    pub hours_worked: Decimal,
    /// Total billing units worked.
    pub units_worked: u64,
}

impl WorkRecord {
    /// Creates a work record.
    pub fn new(
        client_id: impl Into<String>,
        staff_id: impl Into<String>,
        hours_worked: Decimal,
        units_worked: u64,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            staff_id: staff_id.into(),
            hours_worked,
            units_worked,
        }
    }
}

/// Accepts a JSON/YAML number, string or null for a numeric cell.
pub(crate) fn deserialize_cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_raw_entry_accepts_string_cells() {
        let entry: RawWorkEntry = serde_json::from_str(
            r#"{"client": "C", "staff": "S", "duration": "2.25", "units": "9"}"#,
        )
        .unwrap();
        assert_eq!(entry.duration.as_deref(), Some("2.25"));
        assert_eq!(entry.units.as_deref(), Some("9"));
    }

    #[test]
    fn test_raw_entry_missing_and_null_cells() {
        let entry: RawWorkEntry =
            serde_json::from_str(r#"{"client": "C", "staff": "S", "duration": null}"#).unwrap();
        assert_eq!(entry.duration, None);
        assert_eq!(entry.units, None);
    }

    #[test]
    fn test_raw_entry_keeps_non_numeric_text() {
        let entry: RawWorkEntry =
            serde_json::from_str(r#"{"client": "C", "staff": "S", "duration": "n/a"}"#).unwrap();
        assert_eq!(entry.duration.as_deref(), Some("n/a"));
    }

    #[test]
    fn test_builder_helpers() {
        let entry = RawWorkEntry::new("C", "S", Decimal::from_str("4.5").unwrap()).with_units(18);
        assert_eq!(entry.duration.as_deref(), Some("4.5"));
        assert_eq!(entry.units.as_deref(), Some("18"));
    }
}
