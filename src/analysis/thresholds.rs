//! Regulatory limits for the lane measurements of a network survey.
use std::fmt::Display;

/// Limit attached to a measurement column.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Threshold {
    /// Values at or above this limit are violations.
    Limit(f64),
    /// No limit is defined; the column is never checked.
    Undefined,
}

impl Threshold {
    pub fn limit(&self) -> Option<f64> {
        match self {
            Threshold::Limit(limit) => Some(*limit),
            Threshold::Undefined => None,
        }
    }
}

impl Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Threshold::Limit(limit) => write!(f, "{}", limit),
            Threshold::Undefined => write!(f, "null"),
        }
    }
}

/// Column name to limit, in evaluation order. Lanes L1-L4 and R1-R4.
static ROAD_CONDITION_THRESHOLDS: [(&str, Option<f64>); 32] = [
    ("L1 Lane Roughness BI (in mm/km)", Some(2440.0)),
    ("L2 Lane Roughness BI (in mm/km)", Some(2416.0)),
    ("L3 Lane Roughness BI (in mm/km)", Some(2416.0)),
    ("L4 Lane Roughness BI (in mm/km)", Some(2416.0)),
    ("R1 Lane Roughness BI (in mm/km)", Some(2554.0)),
    ("R2 Lane Roughness BI (in mm/km)", Some(2407.0)),
    ("R3 Lane Roughness BI (in mm/km)", Some(2416.0)),
    ("R4 Lane Roughness BI (in mm/km)", Some(2407.0)),
    ("L1 Rut Depth (in mm)", None),
    ("L2 Rut Depth (in mm)", Some(5.1)),
    ("L3 Rut Depth (in mm)", Some(5.1)),
    ("L4 Rut Depth (in mm)", Some(5.1)),
    ("R1 Rut Depth (in mm)", None),
    ("R2 Rut Depth (in mm)", Some(5.1)),
    ("R3 Rut Depth (in mm)", None),
    ("R4 Rut Depth (in mm)", None),
    ("L1 Crack Area (in % area)", None),
    ("L2 Crack Area (in % area)", None),
    ("L3 Crack Area (in % area)", None),
    ("L4 Crack Area (in % area)", None),
    ("R1 Crack Area (in % area)", None),
    ("R2 Crack Area (in % area)", None),
    ("R3 Crack Area (in % area)", None),
    ("R4 Crack Area (in % area)", None),
    ("L1 Area (% area)", None),
    ("L2 Area (% area)", None),
    ("L3 Area (% area)", None),
    ("L4 Area (% area)", None),
    ("R1 Area (% area)", None),
    ("R2 Area (% area)", None),
    ("R3 Area (% area)", None),
    ("R4 Area (% area)", None),
];

static ROAD_CONDITION: ThresholdTable = ThresholdTable::new(&ROAD_CONDITION_THRESHOLDS);

/// Immutable, ordered mapping from measurement column name to its limit.
///
/// Iteration order is declaration order and determines the order of every
/// report built from the table.
#[derive(Debug)]
pub struct ThresholdTable {
    entries: &'static [(&'static str, Option<f64>)],
}

impl ThresholdTable {
    pub const fn new(entries: &'static [(&'static str, Option<f64>)]) -> Self {
        ThresholdTable { entries }
    }

    /// The fixed road-condition table shared by every session.
    pub fn road_condition() -> &'static ThresholdTable {
        &ROAD_CONDITION
    }

    /// Limit for `column`, or `None` if the column is not part of the analysis.
    pub fn lookup(&self, column: &str) -> Option<Threshold> {
        self.entries
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, limit)| limit.map_or(Threshold::Undefined, Threshold::Limit))
    }

    /// Returns true if `column` is one of the analysed measurement columns.
    pub fn contains(&self, column: &str) -> bool {
        self.entries.iter().any(|(name, _)| *name == column)
    }

    /// The analysed column names, in evaluation order.
    pub fn included_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Column names with their limits, in evaluation order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Threshold)> + '_ {
        self.entries
            .iter()
            .map(|(name, limit)| (*name, limit.map_or(Threshold::Undefined, Threshold::Limit)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_columns() {
        let table = ThresholdTable::road_condition();
        assert_eq!(table.lookup("L1 Lane Roughness BI (in mm/km)"), Some(Threshold::Limit(2440.0)));
        assert_eq!(table.lookup("R1 Lane Roughness BI (in mm/km)"), Some(Threshold::Limit(2554.0)));
        assert_eq!(table.lookup("L2 Rut Depth (in mm)"), Some(Threshold::Limit(5.1)));
        assert_eq!(table.lookup("R3 Rut Depth (in mm)"), Some(Threshold::Undefined));
        assert_eq!(table.lookup("L4 Area (% area)"), Some(Threshold::Undefined));
    }

    #[test]
    fn lookup_unknown_column() {
        let table = ThresholdTable::road_condition();
        assert_eq!(table.lookup("Chainage"), None);
        assert_eq!(table.lookup("l1 lane roughness bi (in mm/km)"), None);
        assert!(!table.contains("Chainage"));
        assert!(table.contains("R4 Crack Area (in % area)"));
    }

    #[test]
    fn included_columns_keep_declaration_order() {
        let table = ThresholdTable::road_condition();
        let columns: Vec<&str> = table.included_columns().collect();
        assert_eq!(columns.len(), table.len());
        assert_eq!(columns.first(), Some(&"L1 Lane Roughness BI (in mm/km)"));
        assert_eq!(columns[8], "L1 Rut Depth (in mm)");
        assert_eq!(columns.last(), Some(&"R4 Area (% area)"));

        let limited = table.entries().filter(|(_, threshold)| threshold.limit().is_some()).count();
        assert_eq!(limited, 12);
    }

    #[test]
    fn display() {
        assert_eq!(Threshold::Limit(2440.0).to_string(), "2440");
        assert_eq!(Threshold::Limit(5.1).to_string(), "5.1");
        assert_eq!(Threshold::Undefined.to_string(), "null");
    }
}
