use axum::{http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use sea_orm::DbErr;
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};
use venturehub::error::{AppError, FieldError};

async fn body_of(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_app_error_display() {
    assert_eq!(AppError::NotFound("investor 42".into()).to_string(), "Not found: investor 42");
    assert_eq!(
        AppError::InvalidRequest("unknown status 'x'".into()).to_string(),
        "Invalid request: unknown status 'x'"
    );
    assert_eq!(
        AppError::Validation(vec![FieldError::new("email", "Please enter a valid email address.")]).to_string(),
        "Validation failed: Please enter a valid email address."
    );
    assert_eq!(
        AppError::InvalidCsv(vec!["a".into(), "b".into()]).to_string(),
        "Invalid CSV: 2 errors"
    );
    assert_eq!(AppError::Csv("bad quote".into()).to_string(), "Error parsing CSV: bad quote");
}

#[test]
fn test_validation_errors_map_to_field_errors() {
    let mut errors = ValidationErrors::new();
    let mut required = ValidationError::new("length");
    required.message = Some("Name is required.".into());
    errors.add("name", required);
    errors.add("email", ValidationError::new("email"));

    match AppError::from(errors) {
        AppError::Validation(fields) => assert_eq!(
            fields,
            vec![
                FieldError::new("email", "Invalid value (email)"),
                FieldError::new("name", "Name is required."),
            ]
        ),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_db_record_not_found_maps_to_not_found() {
    let error = AppError::from(DbErr::RecordNotFound("mentor".into()));
    assert_eq!(error.status_code(), StatusCode::NOT_FOUND);

    let error = AppError::from(DbErr::Custom("duplicate key value".into()));
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error.to_string().contains("duplicate key value"));
}

#[tokio::test]
async fn test_app_error_into_response() {
    let (status, body) = body_of(AppError::NotFound("tool 7".into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found: tool 7");

    let (status, body) = body_of(AppError::Validation(vec![
        FieldError::new("name", "Name is required."),
        FieldError::new("email", "Email is required."),
    ]))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][1]["field"], "email");
    assert_eq!(body["fields"][1]["message"], "Email is required.");

    let (status, body) = body_of(AppError::InvalidCsv(vec![
        "Row 1: Missing required field 'name'".into(),
    ]))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0], "Row 1: Missing required field 'name'");

    let (status, body) = body_of(AppError::InternalError("boom".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error: boom");
    assert!(body.get("fields").is_none());
}
