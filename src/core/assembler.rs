use crate::domain::model::{
    AggregationError, AggregationResult, AreaCode, Breakdown, EmploymentRow, FetchOutcome,
    OutcomeMap, SexSegment,
};
use std::collections::HashMap;

pub const UNKNOWN_ERROR_MESSAGE: &str = "Census API error: unknown";

/// Turns fetch outcomes into sorted rows plus the errors explaining any gaps.
///
/// Walks `area_codes` rather than `outcomes`, so an area whose outcome is
/// missing still surfaces as an error. Rows are sorted by name with a plain
/// byte-wise comparison; ties keep input order. Errors stay in area order,
/// male before female.
pub fn assemble(
    area_codes: &[AreaCode],
    names: &HashMap<AreaCode, String>,
    outcomes: &OutcomeMap,
    breakdown: bool,
) -> AggregationResult {
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for code in area_codes {
        let state_name = names.get(code).cloned().unwrap_or_else(|| code.clone());

        if breakdown {
            let mut male = Breakdown::Missing;
            let mut female = Breakdown::Missing;

            for (segment, slot) in [
                (SexSegment::Male, &mut male),
                (SexSegment::Female, &mut female),
            ] {
                match outcome_for(outcomes, code, segment) {
                    Ok(value) => *slot = Breakdown::Count(value),
                    Err(message) => errors.push(partial_failure(code, Some(segment), message)),
                }
            }

            if male.count().is_some() || female.count().is_some() {
                let total = male.count().unwrap_or(0) + female.count().unwrap_or(0);
                rows.push(EmploymentRow {
                    state_code: code.clone(),
                    state_name,
                    male,
                    female,
                    total: Some(total),
                });
            }
        } else {
            match outcome_for(outcomes, code, SexSegment::Total) {
                Ok(value) => rows.push(EmploymentRow {
                    state_code: code.clone(),
                    state_name,
                    male: Breakdown::Absent,
                    female: Breakdown::Absent,
                    total: Some(value),
                }),
                Err(message) => errors.push(partial_failure(code, None, message)),
            }
        }
    }

    // stable sort
    rows.sort_by(|a, b| a.state_name.cmp(&b.state_name));

    AggregationResult { rows, errors }
}

fn outcome_for(outcomes: &OutcomeMap, code: &AreaCode, segment: SexSegment) -> Result<u64, String> {
    match outcomes.get(&(code.clone(), segment)) {
        Some(FetchOutcome::Value(value)) => Ok(*value),
        Some(FetchOutcome::Failed(message)) => Err(message.clone()),
        None => Err(UNKNOWN_ERROR_MESSAGE.to_string()),
    }
}

fn partial_failure(code: &AreaCode, sex: Option<SexSegment>, message: String) -> AggregationError {
    tracing::warn!(
        state_code = %code,
        sex = sex.map(SexSegment::label),
        message = %message,
        "employment.summary.fetch_partial_failure"
    );

    AggregationError {
        state_code: code.clone(),
        sex,
        message,
    }
}
