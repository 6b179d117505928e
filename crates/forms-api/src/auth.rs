//! Credential sources for the Forms service.
//!
//! [`InstalledAppAuth`] runs the OAuth installed-application flow once,
//! persists the resulting token, and refreshes it silently on later runs.

use std::cell::RefCell;
use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Scope needed to create forms and edit their content.
pub const FORMS_BODY_SCOPE: &str = "https://www.googleapis.com/auth/forms.body";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Limits applied to each connection on the loopback redirect listener.
const REDIRECT_READ_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECT_HEAD: u64 = 16 * 1024;

const CONSENT_DONE_PAGE: &str =
    "The authentication flow has completed. You may close this window.";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to read client secrets {path}: {source}")]
    ClientSecretsRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("client secrets {path} are not valid JSON: {source}")]
    ClientSecretsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("client secrets {0} contain neither an `installed` nor a `web` client")]
    ClientSecretsShape(PathBuf),
    #[error("failed to write token file {path}: {source}")]
    TokenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("authorization was not granted: {0}")]
    Consent(String),
    #[error("token endpoint rejected the request ({status}): {body}")]
    TokenEndpoint { status: u16, body: String },
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("local redirect listener failed: {0}")]
    Io(#[from] io::Error),
}

/// Produces a bearer token accepted by the Forms service.
pub trait AuthProvider {
    fn access_token(&self) -> Result<String, AuthError>;
}

impl<T: AuthProvider + ?Sized> AuthProvider for &T {
    fn access_token(&self) -> Result<String, AuthError> {
        (**self).access_token()
    }
}

impl<T: AuthProvider + ?Sized> AuthProvider for Box<T> {
    fn access_token(&self) -> Result<String, AuthError> {
        (**self).access_token()
    }
}

/// A token obtained elsewhere, used as-is.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl AuthProvider for StaticToken {
    fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

/// OAuth client registration as downloaded from the cloud console.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.into()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.into()
}

#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    #[serde(default)]
    installed: Option<ClientSecrets>,
    #[serde(default)]
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let contents = fs::read_to_string(path).map_err(|source| AuthError::ClientSecretsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents, path)
    }

    fn from_json(contents: &str, path: &Path) -> Result<Self, AuthError> {
        let file: ClientSecretsFile =
            serde_json::from_str(contents).map_err(|source| AuthError::ClientSecretsParse {
                path: path.to_path_buf(),
                source,
            })?;
        file.installed
            .or(file.web)
            .ok_or_else(|| AuthError::ClientSecretsShape(path.to_path_buf()))
    }
}

/// Authorized-user token persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// A token without a recorded expiry is assumed to be valid.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry - TimeDelta::seconds(EXPIRY_SKEW_SECS) > now,
            None => true,
        }
    }

    pub fn covers(&self, scopes: &[String]) -> bool {
        scopes.iter().all(|scope| self.scopes.contains(scope))
    }

    pub fn load(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(token) => Some(token),
            Err(err) => {
                warn!("ignoring unreadable token file {}: {}", path.display(), err);
                None
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), AuthError> {
        let to_error = |source: io::Error| AuthError::TokenFile {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(to_error)?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(io::Error::other)
            .map_err(to_error)?;
        fs::write(path, contents).map_err(to_error)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

/// Installed-application OAuth flow backed by a client secrets file and a
/// token file.
pub struct InstalledAppAuth {
    client_secrets: PathBuf,
    token_file: PathBuf,
    scopes: Vec<String>,
    http: reqwest::blocking::Client,
    cached: RefCell<Option<StoredToken>>,
}

impl InstalledAppAuth {
    pub fn new(
        client_secrets: impl Into<PathBuf>,
        token_file: impl Into<PathBuf>,
    ) -> Result<Self, AuthError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client_secrets: client_secrets.into(),
            token_file: token_file.into(),
            scopes: vec![FORMS_BODY_SCOPE.to_string()],
            http,
            cached: RefCell::new(None),
        })
    }

    pub fn token_file(&self) -> &Path {
        &self.token_file
    }

    fn current_token(&self) -> Result<StoredToken, AuthError> {
        let now = Utc::now();
        if let Some(token) = self.cached.borrow().as_ref()
            && token.is_valid_at(now)
        {
            return Ok(token.clone());
        }

        let stored = StoredToken::load(&self.token_file).filter(|token| token.covers(&self.scopes));
        let token = match stored {
            Some(token) if token.is_valid_at(now) => {
                debug!("using stored token from {}", self.token_file.display());
                token
            }
            Some(token) if token.refresh_token.is_some() => {
                info!("refreshing expired access token");
                let token = self.refresh(token)?;
                token.save(&self.token_file)?;
                token
            }
            _ => {
                let secrets = ClientSecrets::from_file(&self.client_secrets)?;
                let token = self.run_consent_flow(&secrets)?;
                token.save(&self.token_file)?;
                info!("saved credentials to {}", self.token_file.display());
                token
            }
        };

        *self.cached.borrow_mut() = Some(token.clone());
        Ok(token)
    }

    fn refresh(&self, token: StoredToken) -> Result<StoredToken, AuthError> {
        let refresh_token = token.refresh_token.clone().unwrap_or_default();
        let response = self.token_request(
            &token.token_uri,
            &[
                ("grant_type", "refresh_token"),
                ("client_id", &token.client_id),
                ("client_secret", &token.client_secret),
                ("refresh_token", &refresh_token),
            ],
        )?;
        Ok(StoredToken {
            token: response.access_token,
            refresh_token: response.refresh_token.or(token.refresh_token),
            expiry: expiry_from(response.expires_in),
            ..token
        })
    }

    fn run_consent_flow(&self, secrets: &ClientSecrets) -> Result<StoredToken, AuthError> {
        let listener = TcpListener::bind(("127.0.0.1", 0))?;
        let redirect_uri = format!("http://localhost:{}/", listener.local_addr()?.port());
        let state = consent_state();
        let consent_url = consent_url(secrets, &redirect_uri, &self.scopes, &state)?;

        eprintln!("Please visit this URL to authorize this application: {}", consent_url);
        let code = wait_for_code(&listener, &state, REDIRECT_READ_TIMEOUT)?;

        let response = self.token_request(
            &secrets.token_uri,
            &[
                ("grant_type", "authorization_code"),
                ("code", &code),
                ("client_id", &secrets.client_id),
                ("client_secret", &secrets.client_secret),
                ("redirect_uri", &redirect_uri),
            ],
        )?;

        let scopes = response
            .scope
            .as_deref()
            .map(|scope| scope.split_whitespace().map(str::to_string).collect())
            .unwrap_or_else(|| self.scopes.clone());
        Ok(StoredToken {
            token: response.access_token,
            refresh_token: response.refresh_token,
            token_uri: secrets.token_uri.clone(),
            client_id: secrets.client_id.clone(),
            client_secret: secrets.client_secret.clone(),
            scopes,
            expiry: expiry_from(response.expires_in),
        })
    }

    fn token_request(
        &self,
        token_uri: &str,
        params: &[(&str, &str)],
    ) -> Result<TokenResponse, AuthError> {
        let response = self.http.post(token_uri).form(params).send()?;
        let status = response.status();
        debug!("token endpoint status: {}", status);
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json()?)
    }
}

impl AuthProvider for InstalledAppAuth {
    fn access_token(&self) -> Result<String, AuthError> {
        self.current_token().map(|token| token.token)
    }
}

fn expiry_from(expires_in: Option<i64>) -> Option<DateTime<Utc>> {
    expires_in.map(|secs| Utc::now() + TimeDelta::seconds(secs))
}

fn consent_state() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{:x}{:x}", nanos, std::process::id())
}

/// Address of the consent page the user must open.
pub fn consent_url(
    secrets: &ClientSecrets,
    redirect_uri: &str,
    scopes: &[String],
    state: &str,
) -> Result<Url, AuthError> {
    let scope = scopes.join(" ");
    Url::parse_with_params(
        &secrets.auth_uri,
        [
            ("response_type", "code"),
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ],
    )
    .map_err(|err| AuthError::Consent(format!("invalid auth_uri '{}': {}", secrets.auth_uri, err)))
}

/// Serve redirects on `listener` until one carries the authorization code.
///
/// Connections that stall past `read_timeout` or send an oversized request
/// head are dropped and the listener keeps waiting.
fn wait_for_code(
    listener: &TcpListener,
    state: &str,
    read_timeout: Duration,
) -> Result<String, AuthError> {
    for stream in listener.incoming() {
        let mut stream = stream?;
        let target = match read_request_target(&stream, read_timeout) {
            Ok(target) => target,
            Err(err) => {
                warn!("dropping redirect connection: {}", err);
                continue;
            }
        };
        let Some(target) = target else {
            respond(&mut stream, "404 Not Found", "")?;
            continue;
        };
        match parse_redirect(&target, state) {
            Some(Ok(code)) => {
                respond(&mut stream, "200 OK", CONSENT_DONE_PAGE)?;
                return Ok(code);
            }
            Some(Err(reason)) => {
                respond(&mut stream, "400 Bad Request", &reason)?;
                return Err(AuthError::Consent(reason));
            }
            None => respond(&mut stream, "404 Not Found", "")?,
        }
    }
    Err(AuthError::Consent("redirect listener closed".into()))
}

fn read_request_target(
    stream: &TcpStream,
    read_timeout: Duration,
) -> io::Result<Option<String>> {
    stream.set_read_timeout(Some(read_timeout))?;
    let mut reader = BufReader::new(stream.take(MAX_REDIRECT_HEAD));
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let mut header = String::new();
    loop {
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            if reader.get_ref().limit() == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "redirect request head too large",
                ));
            }
            break;
        }
        if header.trim().is_empty() {
            break;
        }
    }
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("GET"), Some(target)) => Ok(Some(target.to_string())),
        _ => Ok(None),
    }
}

fn respond(stream: &mut TcpStream, status: &str, body: &str) -> io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 {status}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )?;
    stream.flush()
}

/// Extract the authorization code from a redirect request target.
///
/// Returns `None` for requests unrelated to the flow (for example a favicon).
pub fn parse_redirect(target: &str, expected_state: &str) -> Option<Result<String, String>> {
    let url = Url::parse("http://localhost").ok()?.join(target).ok()?;
    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Some(Err(format!("consent denied: {error}")));
    }
    let code = code?;
    if state.as_deref() != Some(expected_state) {
        return Some(Err("state mismatch in authorization response".into()));
    }
    Some(Ok(code))
}
