use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::DatabaseError;
use crate::table::Table;

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap, DatabaseError> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&self.anon_key)
            .map_err(|e| DatabaseError::Transport(format!("Invalid API key header: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.anon_key))
            .map_err(|e| DatabaseError::Transport(format!("Invalid API key header: {}", e)))?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>)
                            -> Result<T, DatabaseError>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, DatabaseError>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                404 => DatabaseError::NotFound(error_text),
                409 => DatabaseError::Conflict(error_text),
                code => DatabaseError::Api { status: code, message: error_text },
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// `GET /rest/v1/<table>?<query>`
    pub async fn select<T>(&self, table: Table, query: &str) -> Result<Vec<T>, DatabaseError>
    where T: DeserializeOwned {
        let path = if query.is_empty() {
            table.rest_path()
        } else {
            format!("{}?{}", table.rest_path(), query)
        };
        self.request(Method::GET, &path, None).await
    }

    /// Inserts one row and returns the stored representation.
    pub async fn insert<T>(&self, table: Table, row: Value) -> Result<T, DatabaseError>
    where T: DeserializeOwned {
        let rows: Vec<T> = self.request_with_headers(
            Method::POST,
            &table.rest_path(),
            Some(row),
            Some(Self::representation_headers()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| DatabaseError::Decode(format!("Insert into {} returned no rows", table)))
    }

    /// Patches rows matching `filter` and returns them; an empty result means nothing matched.
    pub async fn update_where<T>(&self, table: Table, filter: &str, changes: Value)
                                 -> Result<Vec<T>, DatabaseError>
    where T: DeserializeOwned {
        let path = format!("{}?{}", table.rest_path(), filter);
        self.request_with_headers(
            Method::PATCH,
            &path,
            Some(changes),
            Some(Self::representation_headers()),
        ).await
    }

    /// Deletes rows matching `filter` and returns how many were removed.
    pub async fn delete_where(&self, table: Table, filter: &str) -> Result<usize, DatabaseError> {
        let path = format!("{}?{}", table.rest_path(), filter);
        let rows: Vec<Value> = self.request_with_headers(
            Method::DELETE,
            &path,
            None,
            Some(Self::representation_headers()),
        ).await?;
        Ok(rows.len())
    }

    /// Cheap request used at startup to fail fast when the database is unreachable.
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        let _: Vec<Value> = self.select(Table::Dentists, "select=id&limit=1").await?;
        Ok(())
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    fn representation_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SupabaseClient {
        let mut config = AppConfig::in_memory();
        config.supabase_url = server.uri();
        config.supabase_anon_key = "test-anon-key".to_string();
        SupabaseClient::new(&config)
    }

    #[tokio::test]
    async fn test_select_sends_api_key_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/dentists"))
            .and(query_param("license_number", "eq.D-100"))
            .and(header("apikey", "test-anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
            .mount(&server)
            .await;

        let rows: Vec<Value> = client_for(&server)
            .select(Table::Dentists, "license_number=eq.D-100")
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_conflict_status_maps_to_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/appointments"))
            .and(header("Prefer", "return=representation"))
            .respond_with(ResponseTemplate::new(409).set_body_string("duplicate key value"))
            .mount(&server)
            .await;

        let result: Result<Value, _> = client_for(&server)
            .insert(Table::Appointments, json!({ "description": "x" }))
            .await;

        assert_matches!(result, Err(DatabaseError::Conflict(msg)) if msg.contains("duplicate"));
    }

    #[tokio::test]
    async fn test_delete_where_counts_rows() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/patients"))
            .and(query_param("id", "eq.7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let removed = client_for(&server)
            .delete_where(Table::Patients, "id=eq.7")
            .await
            .unwrap();

        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/dentists"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = client_for(&server).health_check().await;

        assert_matches!(result, Err(DatabaseError::Api { status: 500, .. }));
    }
}
