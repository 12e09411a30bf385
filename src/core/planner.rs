use crate::domain::model::{AreaCode, FetchRequest, SexSegment};

/// Expands area codes into one upstream request per area, or one per sex
/// segment (male, then female) when `breakdown` is set.
pub fn plan(area_codes: &[AreaCode], quarter: &str, breakdown: bool) -> Vec<FetchRequest> {
    let segments: &[SexSegment] = if breakdown {
        &SexSegment::BREAKDOWN
    } else {
        &[SexSegment::Total]
    };

    area_codes
        .iter()
        .flat_map(|code| {
            segments.iter().map(move |segment| FetchRequest {
                area_code: code.clone(),
                quarter: quarter.to_string(),
                segment: *segment,
            })
        })
        .collect()
}
