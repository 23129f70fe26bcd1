use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dentist_cell::models::NewDentist;
use dentist_cell::services::{DentistRepository, SupabaseDentistRepository};
use shared_database::{supabase::SupabaseClient, DatabaseError};
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn repository(server: &MockServer) -> SupabaseDentistRepository {
    let config = TestConfig::with_supabase_url(&server.uri()).to_app_config();
    SupabaseDentistRepository::new(Arc::new(SupabaseClient::new(&config)))
}

#[tokio::test]
async fn test_get_by_license_filters_on_natural_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/dentists"))
        .and(query_param("license_number", "eq.D-100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::dentist_row(3, "D-100")
        ])))
        .mount(&server)
        .await;

    let dentist = repository(&server).get_by_license("D-100").await.unwrap().unwrap();

    assert_eq!(dentist.id, 3);
    assert_eq!(dentist.license_number, "D-100");
}

#[tokio::test]
async fn test_save_maps_unique_violation_to_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/dentists"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response("duplicate key value violates unique constraint", "23505")
        ))
        .mount(&server)
        .await;

    let result = repository(&server)
        .save(&NewDentist {
            surname: "Souza".to_string(),
            name: "Ana".to_string(),
            license_number: "D-100".to_string(),
        })
        .await;

    assert_matches!(result, Err(DatabaseError::Conflict(_)));
}

#[tokio::test]
async fn test_update_of_missing_row_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/dentists"))
        .and(query_param("id", "eq.9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = repository(&server)
        .update(9, &NewDentist {
            surname: "Souza".to_string(),
            name: "Ana".to_string(),
            license_number: "D-100".to_string(),
        })
        .await
        .unwrap();

    assert!(result.is_none());
}
