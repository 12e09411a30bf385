use crate::domain::model::StateInfo;
use std::sync::OnceLock;

/// FIPS codes of the 50 states and the District of Columbia.
const US_STATES: &[(&str, &str)] = &[
    ("01", "Alabama"),
    ("02", "Alaska"),
    ("04", "Arizona"),
    ("05", "Arkansas"),
    ("06", "California"),
    ("08", "Colorado"),
    ("09", "Connecticut"),
    ("10", "Delaware"),
    ("11", "District of Columbia"),
    ("12", "Florida"),
    ("13", "Georgia"),
    ("15", "Hawaii"),
    ("16", "Idaho"),
    ("17", "Illinois"),
    ("18", "Indiana"),
    ("19", "Iowa"),
    ("20", "Kansas"),
    ("21", "Kentucky"),
    ("22", "Louisiana"),
    ("23", "Maine"),
    ("24", "Maryland"),
    ("25", "Massachusetts"),
    ("26", "Michigan"),
    ("27", "Minnesota"),
    ("28", "Mississippi"),
    ("29", "Missouri"),
    ("30", "Montana"),
    ("31", "Nebraska"),
    ("32", "Nevada"),
    ("33", "New Hampshire"),
    ("34", "New Jersey"),
    ("35", "New Mexico"),
    ("36", "New York"),
    ("37", "North Carolina"),
    ("38", "North Dakota"),
    ("39", "Ohio"),
    ("40", "Oklahoma"),
    ("41", "Oregon"),
    ("42", "Pennsylvania"),
    ("44", "Rhode Island"),
    ("45", "South Carolina"),
    ("46", "South Dakota"),
    ("47", "Tennessee"),
    ("48", "Texas"),
    ("49", "Utah"),
    ("50", "Vermont"),
    ("51", "Virginia"),
    ("53", "Washington"),
    ("54", "West Virginia"),
    ("55", "Wisconsin"),
    ("56", "Wyoming"),
];

/// Built-in state table, in FIPS order.
pub fn us_states() -> &'static [StateInfo] {
    static STATES: OnceLock<Vec<StateInfo>> = OnceLock::new();
    STATES.get_or_init(|| {
        US_STATES
            .iter()
            .map(|(code, name)| StateInfo {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect()
    })
}

/// Resolves the `states` query parameter against the configured table.
///
/// `ALL` or an empty value selects every state. Otherwise the comma-separated
/// codes are intersected with the table: unknown codes are dropped and the
/// result follows table order without duplicates.
pub fn select_codes(table: &[StateInfo], param: Option<&str>) -> Vec<String> {
    let param = param.map(str::trim).unwrap_or("ALL");

    if param.is_empty() || param == "ALL" {
        return table.iter().map(|s| s.code.clone()).collect();
    }

    let requested: Vec<&str> = param.split(',').map(str::trim).collect();

    table
        .iter()
        .filter(|s| requested.contains(&s.code.as_str()))
        .map(|s| s.code.clone())
        .collect()
}
