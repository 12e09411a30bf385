use census_employment::domain::model::Breakdown;
use census_employment::{
    AggregationError, BatchExecutor, EmploymentAggregator, SexSegment, StateInfo,
};
use httpmock::prelude::*;
use serde_json::json;

fn states(entries: &[(&str, &str)]) -> Vec<StateInfo> {
    entries
        .iter()
        .map(|(code, name)| StateInfo {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
}

fn aggregator(server: &MockServer, table: &[(&str, &str)]) -> EmploymentAggregator {
    let executor = BatchExecutor::new(reqwest::Client::new(), server.url("/qwi"));
    EmploymentAggregator::new(executor, &states(table))
}

#[tokio::test]
async fn test_returns_rows_and_errors_without_sex_breakdown() {
    let server = MockServer::start();
    let beta = server.mock(|when, then| {
        when.method(GET).path("/qwi").query_param("for", "state:02");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([["Emp"], [2000]]));
    });
    let alpha = server.mock(|when, then| {
        when.method(GET).path("/qwi").query_param("for", "state:01");
        then.status(500).json_body(json!([]));
    });

    let service = aggregator(&server, &[("01", "Alpha"), ("02", "Beta")]);
    let result = service
        .get_employment_summary(&codes(&["02", "01"]), "2024-Q1", false)
        .await;

    beta.assert();
    alpha.assert();

    assert_eq!(
        serde_json::to_value(&result.rows).unwrap(),
        json!([{"stateCode": "02", "stateName": "Beta", "total": 2000}])
    );
    assert_eq!(
        result.errors,
        vec![AggregationError {
            state_code: "01".to_string(),
            sex: None,
            message: "Census API error: 500".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_keeps_partial_data_when_only_one_sex_fetch_succeeds() {
    let server = MockServer::start();
    let male = server.mock(|when, then| {
        when.method(GET)
            .path("/qwi")
            .query_param("sex", "1")
            .query_param("time", "2024-Q2");
        then.status(200).json_body(json!([["Emp"], [300]]));
    });
    let female = server.mock(|when, then| {
        when.method(GET).path("/qwi").query_param("sex", "2");
        then.status(500);
    });

    let service = aggregator(&server, &[("01", "Alpha")]);
    let result = service
        .get_employment_summary(&codes(&["01"]), "2024-Q2", true)
        .await;

    male.assert();
    female.assert();

    assert_eq!(
        serde_json::to_value(&result.rows).unwrap(),
        json!([{
            "stateCode": "01",
            "stateName": "Alpha",
            "male": 300,
            "female": null,
            "total": 300
        }])
    );
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].sex, Some(SexSegment::Female));
    assert!(result.errors[0].message.contains("500"));
}

#[tokio::test]
async fn test_all_failures_yield_one_error_per_fetch() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/qwi");
        then.status(503);
    });

    let table = [("01", "Alpha"), ("02", "Beta"), ("03", "Gamma")];
    let service = aggregator(&server, &table);

    let result = service
        .get_employment_summary(&codes(&["01", "02", "03"]), "2023-Q4", true)
        .await;

    api_mock.assert_hits(6);
    assert!(result.rows.is_empty());
    assert!(result.failed_all());
    assert_eq!(result.errors.len(), 6);

    // Errors follow input order, male before female, regardless of completion order.
    let order: Vec<(&str, Option<SexSegment>)> = result
        .errors
        .iter()
        .map(|e| (e.state_code.as_str(), e.sex))
        .collect();
    assert_eq!(
        order,
        vec![
            ("01", Some(SexSegment::Male)),
            ("01", Some(SexSegment::Female)),
            ("02", Some(SexSegment::Male)),
            ("02", Some(SexSegment::Female)),
            ("03", Some(SexSegment::Male)),
            ("03", Some(SexSegment::Female)),
        ]
    );
}

#[tokio::test]
async fn test_each_area_yields_row_or_error_without_breakdown() {
    let server = MockServer::start();
    for (code, value) in [("01", 10), ("03", 30), ("05", 50)] {
        server.mock(|when, then| {
            when.method(GET).query_param("for", format!("state:{}", code));
            then.status(200).json_body(json!([["Emp"], [value]]));
        });
    }
    for code in ["02", "04"] {
        server.mock(|when, then| {
            when.method(GET).query_param("for", format!("state:{}", code));
            then.status(404);
        });
    }

    let table = [
        ("01", "Echo"),
        ("02", "Delta"),
        ("03", "Charlie"),
        ("04", "Bravo"),
        ("05", "Alpha"),
    ];
    let service = aggregator(&server, &table);
    let input = codes(&["01", "02", "03", "04", "05"]);

    let result = service.get_employment_summary(&input, "2023-Q4", false).await;

    assert_eq!(result.rows.len() + result.errors.len(), input.len());
    let names: Vec<&str> = result.rows.iter().map(|r| r.state_name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Charlie", "Echo"]);
    assert!(result.rows.iter().all(|r| r.male == Breakdown::Absent));
    let failed: Vec<&str> = result.errors.iter().map(|e| e.state_code.as_str()).collect();
    assert_eq!(failed, vec!["02", "04"]);
}

#[tokio::test]
async fn test_census_string_values_and_empty_payloads() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).query_param("for", "state:06");
        then.status(200).json_body(json!([
            ["Emp", "time", "sex", "state"],
            ["17254321", "2023-Q4", "0", "06"]
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).query_param("for", "state:12");
        then.status(204);
    });

    let service = aggregator(&server, &[("06", "California"), ("12", "Florida")]);
    let result = service
        .get_employment_summary(&codes(&["06", "12"]), "2023-Q4", false)
        .await;

    assert!(result.errors.is_empty());
    assert_eq!(result.rows[0].total, Some(17_254_321));
    assert_eq!(result.rows[1].state_name, "Florida");
    assert_eq!(result.rows[1].total, Some(0));
}

#[tokio::test]
async fn test_empty_input_makes_no_calls() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(json!([["Emp"], [1]]));
    });

    let service = aggregator(&server, &[("01", "Alpha")]);
    let result = service.get_employment_summary(&[], "2023-Q4", true).await;

    api_mock.assert_hits(0);
    assert!(result.rows.is_empty());
    assert!(result.errors.is_empty());
}
