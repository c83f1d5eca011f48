//! HTTP implementation of the identity-collaborator port.
//!
//! Accounts live behind `/accounts` and `/sessions`; profile documents are
//! a flat `/profiles` collection queried by `uid`. Collaborator rejections
//! are surfaced verbatim so the user sees the backend's own message.

use async_trait::async_trait;
use fxbet_domain::UserProfile;
use fxbet_domain::config::IdentityConfig;
use fxbet_kernel::ports::{Credentials, IdentityError, IdentityGateway, SignedIn};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT_SECONDS: u64 = 30;
const API_KEY_HEADER: &str = "x-api-key";

/// Client for the identity collaborator.
#[derive(Debug, Clone)]
pub struct RestIdentityGateway {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccountBody {
    uid: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct DocumentRef {
    id: String,
}

/// Error body shape the collaborator uses for rejections.
#[derive(Debug, Deserialize)]
struct RejectionBody {
    message: String,
}

impl RestIdentityGateway {
    /// Builds the gateway from the identity section of the configuration.
    ///
    /// # Errors
    /// Returns [`IdentityError::Network`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.post(self.url(path)).header(API_KEY_HEADER, &self.api_key)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(self.url(path)).header(API_KEY_HEADER, &self.api_key)
    }
}

/// Maps transport failures to [`IdentityError::Network`] and non-success
/// statuses to [`IdentityError::Rejected`] carrying the collaborator's own
/// message.
async fn checked(
    outcome: Result<reqwest::Response, reqwest::Error>,
) -> Result<reqwest::Response, IdentityError> {
    let response = outcome.map_err(|e| IdentityError::Network(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let raw = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<RejectionBody>(&raw)
        .map_or_else(|_| raw.clone(), |body| body.message);
    let message =
        if message.is_empty() { status.canonical_reason().unwrap_or("rejected").to_owned() } else { message };
    Err(IdentityError::Rejected { status: status.as_u16(), message })
}

async fn decoded<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, IdentityError> {
    response.json().await.map_err(|e| IdentityError::Malformed(e.to_string()))
}

#[async_trait]
impl IdentityGateway for RestIdentityGateway {
    async fn create_account(&self, credentials: &Credentials) -> Result<String, IdentityError> {
        debug!(email = %credentials.email, "Creating account");
        let body =
            CredentialsBody { email: &credentials.email, password: &credentials.password };
        let response = checked(self.post("/accounts").json(&body).send().await).await?;
        let account: AccountBody = decoded(response).await?;
        Ok(account.uid)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<SignedIn, IdentityError> {
        let body =
            CredentialsBody { email: &credentials.email, password: &credentials.password };
        let response = checked(self.post("/sessions").json(&body).send().await).await?;
        let account: AccountBody = decoded(response).await?;

        // The profile resolve is best-effort: a sign-in with an unreadable
        // profile still signs in, it just carries no document.
        let profile = match self.profile_by_uid(&account.uid).await {
            Ok(profile) => profile,
            Err(error) => {
                warn!(uid = %account.uid, error = %error, "Profile resolve failed after sign-in");
                None
            }
        };

        let email = if account.email.is_empty() { credentials.email.clone() } else { account.email };
        Ok(SignedIn { uid: account.uid, email, profile })
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<String, IdentityError> {
        let response = checked(self.post("/profiles").json(profile).send().await).await?;
        let stored: DocumentRef = decoded(response).await?;
        debug!(id = %stored.id, uid = %profile.uid, "Profile document stored");
        Ok(stored.id)
    }

    async fn profile_by_uid(&self, uid: &str) -> Result<Option<UserProfile>, IdentityError> {
        let response =
            checked(self.get("/profiles").query(&[("uid", uid)]).send().await).await?;
        let mut matches: Vec<UserProfile> = decoded(response).await?;
        if matches.len() > 1 {
            warn!(uid, count = matches.len(), "Multiple profile documents for one account");
        }
        Ok(if matches.is_empty() { None } else { Some(matches.swap_remove(0)) })
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, IdentityError> {
        let response = checked(self.get("/profiles").send().await).await?;
        decoded(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> RestIdentityGateway {
        RestIdentityGateway::new(&IdentityConfig {
            base_url: server.uri(),
            api_key: "test-key".to_owned(),
        })
        .unwrap()
    }

    fn credentials() -> Credentials {
        Credentials { email: "maria@example.com".to_owned(), password: "secret1".to_owned() }
    }

    fn profile_json(uid: &str, is_admin: bool) -> serde_json::Value {
        serde_json::json!({
            "uid": uid,
            "nome": "Maria Souza",
            "email": "maria@example.com",
            "cpf": "52998224725",
            "rg": "123456789",
            "telefone": "11987654321",
            "dataNascimento": "1990-04-12",
            "nacionalidade": "Brasileira",
            "genero": "Feminino",
            "cep": "01001000",
            "logradouro": "Praça da Sé",
            "numero": "100",
            "bairro": "Sé",
            "cidade": "São Paulo",
            "estado": "SP",
            "isAdmin": is_admin,
            "dataCadastro": "2025-04-01T12:00:00Z"
        })
    }

    #[tokio::test]
    async fn create_account_returns_the_uid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts"))
            .and(body_partial_json(serde_json::json!({ "email": "maria@example.com" })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({ "uid": "u-42" })),
            )
            .mount(&server)
            .await;

        let uid = gateway(&server).create_account(&credentials()).await.unwrap();
        assert_eq!(uid, "u-42");
    }

    #[tokio::test]
    async fn rejections_surface_the_collaborator_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(409).set_body_json(
                serde_json::json!({ "message": "email already registered" }),
            ))
            .mount(&server)
            .await;

        let error = gateway(&server).create_account(&credentials()).await.unwrap_err();
        match error {
            IdentityError::Rejected { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "email already registered");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn sign_in_resolves_the_profile_document() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({ "uid": "u-42", "email": "maria@example.com" }),
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/profiles"))
            .and(query_param("uid", "u-42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([profile_json("u-42", true)])),
            )
            .mount(&server)
            .await;

        let signed = gateway(&server).sign_in(&credentials()).await.unwrap();
        assert_eq!(signed.uid, "u-42");
        let profile = signed.profile.unwrap();
        assert!(profile.is_admin);
        assert_eq!(profile.name, "Maria Souza");
    }

    #[tokio::test]
    async fn sign_in_degrades_an_unreadable_profile_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "uid": "u-42" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/profiles"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let signed = gateway(&server).sign_in(&credentials()).await.unwrap();
        assert_eq!(signed.uid, "u-42");
        assert_eq!(signed.email, "maria@example.com");
        assert!(signed.profile.is_none());
    }

    #[tokio::test]
    async fn list_profiles_decodes_the_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profiles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                profile_json("u-1", false),
                profile_json("u-2", true),
            ])))
            .mount(&server)
            .await;

        let profiles = gateway(&server).list_profiles().await.unwrap();
        assert_eq!(profiles.len(), 2);
        assert!(profiles[1].is_admin);
    }

    #[tokio::test]
    async fn transport_failures_map_to_network() {
        let gateway = RestIdentityGateway::new(&IdentityConfig {
            base_url: "http://127.0.0.1:1".to_owned(),
            api_key: String::new(),
        })
        .unwrap();
        assert!(matches!(
            gateway.list_profiles().await,
            Err(IdentityError::Network(_))
        ));
    }
}
