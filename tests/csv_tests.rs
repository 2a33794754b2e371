use axum::http::StatusCode;

mod common;
use common::{get, get_text, post_csv, test_app};

#[tokio::test]
async fn test_template_round_trips_through_preview() {
    let (app, _) = test_app().await;
    for entity in ["investors", "startups", "mentors", "tools"] {
        let (status, disposition, template) = get_text(&app, &format!("/{}/csv/template", entity)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            disposition.as_deref(),
            Some(format!("attachment; filename=\"{}_template.csv\"", entity).as_str())
        );

        let (status, preview) = post_csv(&app, &format!("/{}/csv/preview", entity), &template).await;
        assert_eq!(status, StatusCode::OK, "{}", entity);
        assert_eq!(preview["rows"].as_array().unwrap().len(), 1);
        assert!(preview["errors"].as_array().unwrap().is_empty(), "{}: {}", entity, preview["errors"]);

        // Preview never writes
        let (_, list) = get(&app, &format!("/{}", entity)).await;
        assert!(list.as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_import_investors() {
    let (app, _) = test_app().await;
    let csv = "name,email,organization,invested_startups,active,status\n\
               Ann,ann@example.com,Acme,3,no,verified\n\
               Bob,bob@example.com,,lots,,\n";

    let (status, result) = post_csv(&app, "/investors/csv/import", csv).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["entity"], "investors");
    assert_eq!(result["inserted"], 2);

    let (_, list) = get(&app, "/investors?q=ann").await;
    assert_eq!(list[0]["invested_startups"], 3);

    let (_, list) = get(&app, "/investors?q=bob").await;
    assert_eq!(list[0]["invested_startups"], 0);
    assert_eq!(list[0]["active"], true);
    assert_eq!(list[0]["status"], "pending");
    assert!(list[0]["organization"].is_null());
}

#[tokio::test]
async fn test_imported_investors_always_await_verification() {
    let (app, _) = test_app().await;
    let csv = "name,email,status,active\nAnn,ann@example.com,verified,false\n";

    let (status, _) = post_csv(&app, "/investors/csv/import", csv).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = get(&app, "/investors").await;
    assert_eq!(list[0]["status"], "pending");
    assert_eq!(list[0]["active"], true);

    let (_, stats) = get(&app, "/investors/stats").await;
    assert_eq!(stats["verified"], 0);
}

#[tokio::test]
async fn test_imported_mentor_is_inactive_unless_marked_active() {
    let (app, _) = test_app().await;
    let csv = "name,email,active,status\n\
               Grace,grace@example.com,true,verified\n\
               Alan,alan@example.com,,\n";

    let (status, _) = post_csv(&app, "/mentors/csv/import", csv).await;
    assert_eq!(status, StatusCode::OK);

    let (_, grace) = get(&app, "/mentors?q=grace").await;
    assert_eq!(grace[0]["active"], true);
    assert_eq!(grace[0]["status"], "verified");

    let (_, alan) = get(&app, "/mentors?q=alan").await;
    assert_eq!(alan[0]["active"], false);
    assert_eq!(alan[0]["status"], "pending");
}

#[tokio::test]
async fn test_preview_errors_follow_row_order() {
    let (app, _) = test_app().await;
    let csv = "name,email,website\n\
               Ann,ann@example.com,not a url\n\
               Bob,bob@example.com,\n\
               Cid,,\n";

    let (status, preview) = post_csv(&app, "/investors/csv/preview", csv).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        preview["errors"],
        serde_json::json!([
            "Row 1: Please enter a valid website URL.",
            "Row 3: Missing required field 'email'",
        ])
    );
}

#[tokio::test]
async fn test_import_is_all_or_nothing() {
    let (app, _) = test_app().await;
    let csv = "name,email\nAnn,ann@example.com\nBob,\n";

    let (status, body) = post_csv(&app, "/investors/csv/import", csv).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0], "Row 2: Missing required field 'email'");

    let (_, overview) = get(&app, "/overview").await;
    assert_eq!(overview["investors"], 0);
}

#[tokio::test]
async fn test_preview_reports_bad_status_and_validation() {
    let (app, _) = test_app().await;
    let csv = "name,email,status,years_of_experience\n\
               Grace,grace@example.com,approved,10\n\
               Alan,alan.example.com,pending,150\n";

    let (status, preview) = post_csv(&app, "/mentors/csv/preview", csv).await;
    assert_eq!(status, StatusCode::OK);
    let errors: Vec<&str> = preview["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert_eq!(
        errors,
        vec![
            "Row 1: Invalid value 'approved' for field 'status'",
            "Row 2: Please enter a valid email address.",
            "Row 2: Years of experience must be between 0 and 100.",
        ]
    );
    assert_eq!(preview["headers"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_import_tools_splits_tags() {
    let (app, _) = test_app().await;
    let csv = "name,category,tags\nLinear,Productivity,\"issues, planning\"\n";
    let (status, _) = post_csv(&app, "/tools/csv/import", csv).await;
    assert_eq!(status, StatusCode::OK);

    let (_, tools) = get(&app, "/tools").await;
    assert_eq!(tools[0]["tags"], serde_json::json!(["issues", "planning"]));
}

#[tokio::test]
async fn test_empty_upload_and_unknown_entity() {
    let (app, _) = test_app().await;

    let (status, body) = post_csv(&app, "/startups/csv/preview", "name,industry\n\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request: No valid data found in CSV file");

    let (status, _) = post_csv(&app, "/founders/csv/import", "name\nAnn\n").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
