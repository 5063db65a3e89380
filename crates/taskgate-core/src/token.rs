//! Bearer-token issuance and validation.
//!
//! Tokens are compact HMAC-signed JWTs carrying a fixed claim set
//! (`authorized`, `user_id`, `role`, `iat`, `exp`). The service holds no
//! mutable state; a single instance is shared by every request.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::role::Role;

/// Lifetime of every issued token. Never refreshed in place.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// The accepted signing family. Anything else is an algorithm substitution.
const HMAC_FAMILY: [Algorithm; 3] =
  [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
  #[error("invalid token signature")]
  InvalidSignature,

  #[error("token has expired")]
  Expired,

  #[error("malformed token")]
  Malformed,

  #[error("token claim has an unexpected type")]
  ClaimTypeError,
}

/// Failure to build the service or to sign a token.
#[derive(Debug, Error)]
pub enum SigningError {
  #[error("signing secret must not be empty")]
  EmptySecret,

  #[error("failed to sign token: {0}")]
  Encode(#[from] jsonwebtoken::errors::Error),
}

// ─── Claims ──────────────────────────────────────────────────────────────────

/// The identity assertion carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// Always `true` for tokens issued by this service.
  pub authorized: bool,
  pub user_id:    u32,
  /// Role bitmask; compare with [`Claims::has_role`].
  pub role:       u32,
  pub iat:        i64,
  pub exp:        i64,
}

impl Claims {
  pub fn new(subject_id: u32, role: Role, issued_at: DateTime<Utc>) -> Self {
    let iat = issued_at.timestamp();
    Self {
      authorized: true,
      user_id: subject_id,
      role: role.bits(),
      iat,
      exp: iat + TOKEN_TTL_SECS,
    }
  }

  /// Exact equality against the role bitmask.
  pub fn has_role(&self, role: Role) -> bool { self.role == role.bits() }

  pub fn role(&self) -> Option<Role> { Role::from_bits(self.role) }
}

/// Claims as they arrive on the wire, before numeric projection.
#[derive(Deserialize)]
struct WireClaims {
  #[serde(default)]
  authorized: bool,
  user_id:    Option<Value>,
  role:       Option<Value>,
  #[serde(default)]
  iat:        Option<i64>,
  exp:        i64,
}

impl WireClaims {
  fn into_claims(self) -> Result<Claims, AuthError> {
    if !self.authorized {
      return Err(AuthError::Malformed);
    }
    Ok(Claims {
      authorized: true,
      user_id:    numeric_claim(self.user_id.as_ref())?,
      role:       numeric_claim(self.role.as_ref())?,
      iat:        self.iat.unwrap_or(self.exp - TOKEN_TTL_SECS),
      exp:        self.exp,
    })
  }
}

/// Project a JSON number (possibly float-encoded) onto a `u32`, rounding to
/// the nearest integer.
fn numeric_claim(value: Option<&Value>) -> Result<u32, AuthError> {
  let value = value.ok_or(AuthError::Malformed)?;
  let number = value.as_f64().ok_or(AuthError::ClaimTypeError)?.round();
  if !(0.0..=f64::from(u32::MAX)).contains(&number) {
    return Err(AuthError::ClaimTypeError);
  }
  Ok(number as u32)
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Issues and validates tokens with a process-wide symmetric secret.
#[derive(Clone)]
pub struct TokenService {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
}

impl TokenService {
  pub fn new(secret: &str) -> Result<Self, SigningError> {
    if secret.is_empty() {
      return Err(SigningError::EmptySecret);
    }

    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.algorithms = HMAC_FAMILY.to_vec();
    validation.leeway = 0;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);

    Ok(Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      validation,
    })
  }

  /// Sign a fresh token for `subject_id`, valid for one hour from now.
  pub fn issue(&self, subject_id: u32, role: Role) -> Result<String, SigningError> {
    self.issue_at(subject_id, role, Utc::now())
  }

  /// Sign a token as if issued at `issued_at`.
  pub fn issue_at(
    &self,
    subject_id: u32,
    role: Role,
    issued_at: DateTime<Utc>,
  ) -> Result<String, SigningError> {
    let claims = Claims::new(subject_id, role, issued_at);
    let token = jsonwebtoken::encode(
      &Header::new(SIGNING_ALGORITHM),
      &claims,
      &self.encoding,
    )?;
    Ok(token)
  }

  /// Verify signature, algorithm and expiry, then parse the claim set.
  pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
    check_algorithm(token)?;
    let data =
      jsonwebtoken::decode::<WireClaims>(token, &self.decoding, &self.validation)
        .map_err(classify)?;
    data.claims.into_claims()
  }

  /// Validate, then project the subject id.
  pub fn subject_id(&self, token: &str) -> Result<u32, AuthError> {
    Ok(self.validate(token)?.user_id)
  }

  /// Fail-closed role predicate: any validation failure reads as `false`.
  pub fn has_role(&self, token: &str, role: Role) -> bool {
    self
      .validate(token)
      .map(|claims| claims.has_role(role))
      .unwrap_or(false)
  }
}

impl std::fmt::Debug for TokenService {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TokenService")
      .field("algorithm", &SIGNING_ALGORITHM)
      .field("ttl_secs", &TOKEN_TTL_SECS)
      .finish()
  }
}

/// Reject headers naming anything outside the HMAC family before the
/// decoder sees them. `none` is not representable by the decoder, so it
/// would otherwise surface as a parse failure instead of a signature one.
fn check_algorithm(token: &str) -> Result<(), AuthError> {
  let header = token
    .split('.')
    .next()
    .filter(|s| !s.is_empty())
    .ok_or(AuthError::Malformed)?;
  let bytes = URL_SAFE_NO_PAD
    .decode(header)
    .map_err(|_| AuthError::Malformed)?;
  let header: Value =
    serde_json::from_slice(&bytes).map_err(|_| AuthError::Malformed)?;

  match header.get("alg").and_then(Value::as_str) {
    Some("HS256" | "HS384" | "HS512") => Ok(()),
    Some(_) => Err(AuthError::InvalidSignature),
    None => Err(AuthError::Malformed),
  }
}

fn classify(e: jsonwebtoken::errors::Error) -> AuthError {
  match e.kind() {
    ErrorKind::InvalidSignature
    | ErrorKind::InvalidAlgorithm
    | ErrorKind::InvalidAlgorithmName => AuthError::InvalidSignature,
    ErrorKind::ExpiredSignature => AuthError::Expired,
    _ => AuthError::Malformed,
  }
}
