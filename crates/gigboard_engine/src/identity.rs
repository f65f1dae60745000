use std::sync::{Arc, PoisonError, RwLock};

use gigboard_core::User;
use gigboard_logging::{board_info, board_warn};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::RestClient;
use crate::{AuthError, AuthFailureKind, AuthSession, BackendSettings, FailureKind, FetchError};

/// Shared slot holding the current auth session.
///
/// The identity provider writes it; the table reader borrows its access token.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<AuthSession>>>,
}

impl SessionStore {
    pub fn new(initial: Option<AuthSession>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn get(&self) -> Option<AuthSession> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.get().map(|session| session.access_token)
    }

    pub fn user(&self) -> Option<User> {
        self.get().map(|session| session.user)
    }

    pub fn set(&self, session: Option<AuthSession>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = session;
    }
}

/// Operations offered by the external identity provider.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;
    /// Returns the user when the provider signs them in straight away
    /// (no email confirmation required).
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<User>, AuthError>;
    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError>;
    async fn update_password(&self, new_password: &str) -> Result<(), AuthError>;
    /// Always drops the local session, even if the provider call fails.
    async fn sign_out(&self) -> Result<(), AuthError>;
    async fn current_user(&self) -> Result<Option<User>, AuthError>;
    /// Adopts an access token handed over by an auth redirect.
    async fn restore_session(&self, access_token: &str) -> Result<User, AuthError>;
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: String,
    email: Option<String>,
}

impl From<UserBody> for User {
    fn from(body: UserBody) -> Self {
        User {
            id: body.id,
            email: body.email.filter(|email| !email.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    access_token: String,
    refresh_token: Option<String>,
    user: UserBody,
}

/// GoTrue-style identity provider reached over `/auth/v1`.
#[derive(Debug, Clone)]
pub struct GoTrueIdentityProvider {
    client: RestClient,
    session: SessionStore,
    redirect_url: Option<String>,
}

impl GoTrueIdentityProvider {
    pub fn new(settings: &BackendSettings, session: SessionStore) -> Result<Self, FetchError> {
        Ok(Self {
            client: RestClient::new(settings)?,
            session,
            redirect_url: settings.redirect_url.clone(),
        })
    }

    fn auth_url(&self, path: &str, with_redirect: bool) -> Result<url::Url, FetchError> {
        let mut url = self.client.endpoint(&format!("auth/v1/{path}"))?;
        if let (true, Some(redirect)) = (with_redirect, self.redirect_url.as_deref()) {
            url.query_pairs_mut().append_pair("redirect_to", redirect);
        }
        Ok(url)
    }

    async fn post(
        &self,
        url: url::Url,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> Result<Value, AuthError> {
        let mut request = self.client.request(Method::POST, url, bearer);
        if let Some(body) = body {
            request = request.json(&body);
        }
        Ok(self.client.send(request).await?)
    }

    fn install(&self, body: SessionBody) -> User {
        let user = User::from(body.user);
        self.session.set(Some(AuthSession {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            user: user.clone(),
        }));
        user
    }

    fn require_token(&self) -> Result<String, AuthError> {
        self.session.access_token().ok_or_else(|| {
            AuthError::new(AuthFailureKind::NotSignedIn, "You need to be logged in.")
        })
    }

    async fn fetch_user(&self, access_token: &str) -> Result<User, FetchError> {
        let url = self.client.endpoint("auth/v1/user")?;
        let request = self.client.request(Method::GET, url, Some(access_token));
        let body = self.client.send(request).await?;
        decode::<UserBody>(body).map(User::from)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GoTrueIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let mut url = self.auth_url("token", false)?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let body = self
            .post(
                url,
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await?;
        let user = self.install(decode::<SessionBody>(body)?);
        board_info!("Signed in user {}", user.id);
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        let url = self.auth_url("signup", true)?;
        let body = self
            .post(
                url,
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await?;
        if body.get("access_token").is_some() {
            let user = self.install(decode::<SessionBody>(body)?);
            board_info!("Signed up and signed in user {}", user.id);
            return Ok(Some(user));
        }
        board_info!("Sign-up pending email confirmation");
        Ok(None)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let url = self.auth_url("recover", true)?;
        self.post(url, Some(json!({ "email": email })), None).await?;
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<(), AuthError> {
        let token = self.require_token()?;
        let url = self.auth_url("user", false)?;
        let request = self
            .client
            .request(Method::PUT, url, Some(&token))
            .json(&json!({ "password": new_password }));
        self.client.send(request).await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(token) = self.session.access_token() else {
            return Ok(());
        };
        self.session.set(None);
        let url = self.auth_url("logout", false)?;
        self.post(url, None, Some(&token)).await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.session.access_token() else {
            return Ok(None);
        };
        match self.fetch_user(&token).await {
            Ok(user) => Ok(Some(user)),
            Err(err) if matches!(err.kind, FailureKind::HttpStatus(401 | 403)) => {
                board_warn!("Stored session rejected: {}", err.message);
                self.session.set(None);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn restore_session(&self, access_token: &str) -> Result<User, AuthError> {
        let user = self.fetch_user(access_token).await?;
        self.session.set(Some(AuthSession {
            access_token: access_token.to_string(),
            refresh_token: None,
            user: user.clone(),
        }));
        Ok(user)
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, FetchError> {
    serde_json::from_value(body)
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
}
