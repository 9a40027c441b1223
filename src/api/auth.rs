use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    api::{
        client::{encode_body, required, ApiClient},
        error::ApiError,
        response::Validate,
    },
    domain::{credential::Credential, request::OutboundRequest},
};

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl RegisterRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
            phone: None,
            location: None,
        }
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("location", &self.location)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Account created by `register`. Some deployments also issue tokens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user: UserProfile,
    pub message: Option<String>,
    pub credential: Option<Credential>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub credential: Credential,
    pub user: Option<UserProfile>,
}

#[derive(Deserialize)]
struct RegisterBody {
    user: UserProfile,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "access_token")]
    access: Option<String>,
    #[serde(default, alias = "refresh_token")]
    refresh: Option<String>,
}

#[derive(Deserialize)]
struct LoginBody {
    #[serde(alias = "accessToken", alias = "access_token")]
    access: String,
    #[serde(default, alias = "refreshToken", alias = "refresh_token")]
    refresh: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
}

impl Validate for LoginBody {
    fn validate(&self) -> Result<(), String> {
        if self.access.trim().is_empty() {
            return Err("login response carries an empty access token".to_owned());
        }
        Ok(())
    }
}

impl Validate for RegisterBody {
    fn validate(&self) -> Result<(), String> {
        if self.user.username.is_empty() {
            return Err("registered user has no username".to_owned());
        }
        Ok(())
    }
}

/// Account operations. None of them touch the credential store.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Registration, ApiError> {
        required("username", &request.username)?;
        required("password", &request.password)?;
        let outbound =
            OutboundRequest::post_json(["auth", "register"], request).map_err(encode_body)?;

        let body: RegisterBody = self.client.fetch_valid(outbound).await?;
        let credential = body
            .access
            .filter(|access| !access.trim().is_empty())
            .map(|access| Credential::new(access, body.refresh));

        Ok(Registration {
            user: body.user,
            message: body.message,
            credential,
        })
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, ApiError> {
        required("username", &request.username)?;
        required("password", &request.password)?;
        let outbound =
            OutboundRequest::post_json(["auth", "login"], request).map_err(encode_body)?;

        let body: LoginBody = self.client.fetch_valid(outbound).await?;
        Ok(LoginGrant {
            credential: Credential::new(body.access, body.refresh),
            user: body.user,
        })
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.client
            .fetch(OutboundRequest::get(["auth", "profile"]))
            .await
    }
}
