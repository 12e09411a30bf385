use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Short opaque area identifier, e.g. a 2-digit state FIPS code.
pub type AreaCode = String;

/// Quarter in `YYYY-Q#` form. Validated before it reaches the aggregator.
pub type Quarter = String;

/// Population segment sent to the Census API as the `sex` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SexSegment {
    Total,
    Male,
    Female,
}

impl SexSegment {
    /// Segments fetched per area when splitting by sex, in fetch order.
    pub const BREAKDOWN: [SexSegment; 2] = [SexSegment::Male, SexSegment::Female];

    pub fn query_code(self) -> &'static str {
        match self {
            SexSegment::Total => "0",
            SexSegment::Male => "1",
            SexSegment::Female => "2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SexSegment::Total => "total",
            SexSegment::Male => "male",
            SexSegment::Female => "female",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    pub area_code: AreaCode,
    pub quarter: Quarter,
    pub segment: SexSegment,
}

impl FetchRequest {
    pub fn key(&self) -> OutcomeKey {
        (self.area_code.clone(), self.segment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Value(u64),
    Failed(String),
}

pub type OutcomeKey = (AreaCode, SexSegment);

pub type OutcomeMap = HashMap<OutcomeKey, FetchOutcome>;

/// One line of the employment summary.
///
/// `male` and `female` are only serialized in breakdown mode; a failed
/// segment serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentRow {
    pub state_code: AreaCode,
    pub state_name: String,
    #[serde(default, skip_serializing_if = "Breakdown::is_absent")]
    pub male: Breakdown,
    #[serde(default, skip_serializing_if = "Breakdown::is_absent")]
    pub female: Breakdown,
    pub total: Option<u64>,
}

/// Per-segment count on a row.
///
/// `Absent` means the row was built without a sex split, `Missing` means the
/// segment was requested but its fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Breakdown {
    #[default]
    Absent,
    Missing,
    Count(u64),
}

impl Breakdown {
    pub fn is_absent(&self) -> bool {
        matches!(self, Breakdown::Absent)
    }

    pub fn count(&self) -> Option<u64> {
        match self {
            Breakdown::Count(v) => Some(*v),
            _ => None,
        }
    }
}

impl Serialize for Breakdown {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Breakdown::Count(v) => serializer.serialize_u64(*v),
            _ => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Breakdown {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<u64>::deserialize(deserializer)? {
            Some(v) => Breakdown::Count(v),
            None => Breakdown::Missing,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationError {
    pub state_code: AreaCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<SexSegment>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub rows: Vec<EmploymentRow>,
    pub errors: Vec<AggregationError>,
}

impl AggregationResult {
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Nothing usable came back and at least one fetch failed.
    pub fn failed_all(&self) -> bool {
        self.rows.is_empty() && !self.errors.is_empty()
    }
}

/// Entry of the static state table served by `/api/states`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateInfo {
    pub code: AreaCode,
    pub name: String,
}
