use crate::models::Profile;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client for the profile collection
///
/// Read-only: the ranking engine never writes back to the store.
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    profiles_collection: String,
    page_size: usize,
    client: Client,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        profiles_collection: String,
        page_size: usize,
        timeout: Duration,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            profiles_collection,
            page_size: page_size.max(1),
            client,
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.profiles_collection
        )
    }

    /// Get a single profile by document ID
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, AppwriteError> {
        let url = format!("{}/{}", self.documents_url(), urlencoding::encode(user_id));

        tracing::debug!("Fetching profile for user: {}", user_id);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(AppwriteError::NotFound(format!("Profile not found for user {}", user_id)));
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(AppwriteError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Failed to fetch profile for {}: {} - {}", user_id, status, body);
                return Err(AppwriteError::ApiError(format!("Failed to fetch profile: {}", status)));
            }
        }

        let doc: Value = response.json().await?;
        let data = doc.get("data").unwrap_or(&doc);

        serde_json::from_value(data.clone())
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }

    /// List every profile in the collection, one page at a time
    ///
    /// Documents that do not parse as a profile are skipped.
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, AppwriteError> {
        let url = self.documents_url();
        let mut profiles = Vec::new();
        let mut offset = 0usize;

        loop {
            let queries = [
                ("queries[]", format!(r#"{{"method":"limit","values":[{}]}}"#, self.page_size)),
                ("queries[]", format!(r#"{{"method":"offset","values":[{}]}}"#, offset)),
            ];

            let response = self
                .client
                .get(&url)
                .query(&queries)
                .header("X-Appwrite-Key", &self.api_key)
                .header("X-Appwrite-Project", &self.project_id)
                .send()
                .await?;

            match response.status() {
                status if status.is_success() => {}
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(AppwriteError::Unauthorized),
                status => {
                    return Err(AppwriteError::ApiError(format!(
                        "Failed to list profiles: {}",
                        status
                    )));
                }
            }

            let json: Value = response.json().await?;

            let total = json
                .get("total")
                .and_then(|t| t.as_u64())
                .map(|t| t as usize);

            let documents = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

            let page_len = documents.len();

            profiles.extend(documents.iter().filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                match serde_json::from_value::<Profile>(data.clone()) {
                    Ok(profile) => Some(profile),
                    Err(e) => {
                        let id = doc.get("$id").and_then(|v| v.as_str()).unwrap_or("<unknown>");
                        tracing::warn!("Skipping malformed profile document {}: {}", id, e);
                        None
                    }
                }
            }));

            offset += page_len;

            // Without a total, only a short page ends the listing
            if page_len < self.page_size || total.is_some_and(|total| offset >= total) {
                break;
            }
        }

        tracing::debug!("Listed {} profiles", profiles.len());

        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use mockito::Matcher;
    use serde_json::json;

    fn create_client(base_url: String, page_size: usize) -> AppwriteClient {
        AppwriteClient::new(
            base_url,
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            "profiles".to_string(),
            page_size,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    const DOCUMENTS_PATH: &str = "/databases/test_db/collections/profiles/documents";

    #[test]
    fn test_appwrite_client_creation() {
        let client = create_client("https://appwrite.test/v1/".to_string(), 0);

        assert_eq!(
            client.documents_url(),
            "https://appwrite.test/v1/databases/test_db/collections/profiles/documents"
        );
        assert_eq!(client.page_size, 1);
    }

    #[tokio::test]
    async fn test_get_profile() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", format!("{}/t1", DOCUMENTS_PATH).as_str())
            .match_header("X-Appwrite-Key", "test_key")
            .match_header("X-Appwrite-Project", "test_project")
            .with_status(200)
            .with_body(
                json!({
                    "$id": "t1",
                    "$collectionId": "profiles",
                    "role": "trainer",
                    "gym": "G",
                    "experience": "4",
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = create_client(server.url(), 100);
        let profile = client.get_profile("t1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(profile.id, "t1");
        assert_eq!(profile.role, Role::Instructor);
        assert_eq!(profile.experience, Some(4));
    }

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", format!("{}/missing", DOCUMENTS_PATH).as_str())
            .with_status(404)
            .create_async()
            .await;

        let client = create_client(server.url(), 100);
        let err = client.get_profile("missing").await.unwrap_err();

        assert!(matches!(err, AppwriteError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", DOCUMENTS_PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = create_client(server.url(), 100);
        let err = client.list_profiles().await.unwrap_err();

        assert!(matches!(err, AppwriteError::Unauthorized));
    }

    #[tokio::test]
    async fn test_list_profiles_pages_and_skips_malformed() {
        let mut server = mockito::Server::new_async().await;

        let first = server
            .mock("GET", DOCUMENTS_PATH)
            .match_query(Matcher::UrlEncoded(
                "queries[]".into(),
                r#"{"method":"offset","values":[0]}"#.into(),
            ))
            .with_status(200)
            .with_body(
                json!({
                    "total": 3,
                    "documents": [
                        { "$id": "t1", "role": "trainer" },
                        { "$id": "broken" },
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let second = server
            .mock("GET", DOCUMENTS_PATH)
            .match_query(Matcher::UrlEncoded(
                "queries[]".into(),
                r#"{"method":"offset","values":[2]}"#.into(),
            ))
            .with_status(200)
            .with_body(
                json!({
                    "total": 3,
                    "documents": [
                        { "$id": "l1", "role": "learner", "targetMuscles": ["chest"] },
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = create_client(server.url(), 2);
        let profiles = client.list_profiles().await.unwrap();

        first.assert_async().await;
        second.assert_async().await;

        let ids: Vec<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "l1"]);
    }

    #[tokio::test]
    async fn test_list_profiles_without_total_reads_until_short_page() {
        let mut server = mockito::Server::new_async().await;

        let first = server
            .mock("GET", DOCUMENTS_PATH)
            .match_query(Matcher::UrlEncoded(
                "queries[]".into(),
                r#"{"method":"offset","values":[0]}"#.into(),
            ))
            .with_status(200)
            .with_body(
                json!({
                    "documents": [
                        { "$id": "t1", "role": "trainer", "age": "34" },
                        { "$id": "t2", "role": "trainer", "age": 300 },
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let second = server
            .mock("GET", DOCUMENTS_PATH)
            .match_query(Matcher::UrlEncoded(
                "queries[]".into(),
                r#"{"method":"offset","values":[2]}"#.into(),
            ))
            .with_status(200)
            .with_body(json!({ "documents": [{ "$id": "l1", "role": "learner" }] }).to_string())
            .create_async()
            .await;

        let client = create_client(server.url(), 2);
        let profiles = client.list_profiles().await.unwrap();

        first.assert_async().await;
        second.assert_async().await;

        let ids: Vec<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "l1"]);
        assert_eq!(profiles[0].age, Some(34));
        assert_eq!(profiles[1].age, None);
        assert_eq!(profiles[1].role, Role::Instructor);
    }
}
