//! AWS Signature Version 4 presigning.
//!
//! Produces presigned URLs using [query string authentication]: the
//! signature, scope and expiry travel in the query string, so the resulting
//! URL can be handed to a third party that never sees the secret key.
//!
//! Only the pieces needed to presign bodiless `GET` requests are provided.
//!
//! [query string authentication]: https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

use crate::{Credentials, SigningError};

pub const ALGORITHM_IDENTIFIER: &str = "AWS4-HMAC-SHA256";
pub const KEY_TYPE_IDENTIFIER: &str = "aws4_request";
pub const ALGORITHM_QUERY_PARAM: &str = "X-Amz-Algorithm";
pub const CREDENTIAL_QUERY_PARAM: &str = "X-Amz-Credential";
pub const AMZ_DATE_QUERY_PARAM: &str = "X-Amz-Date";
pub const EXPIRES_QUERY_PARAM: &str = "X-Amz-Expires";
pub const SIGNED_HEADERS_QUERY_PARAM: &str = "X-Amz-SignedHeaders";
pub const AMZ_SECURITY_TOKEN_QUERY_PARAM: &str = "X-Amz-Security-Token";
pub const AMZ_SIGNATURE_QUERY_PARAM: &str = "X-Amz-Signature";
pub const HOST_HEADER: &str = "host";

/// Timestamp layout used by `X-Amz-Date`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// SHA-256 of the empty string.
pub const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// How the request body is represented in the canonical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// The request has no body; its hash is the hash of the empty string.
    Empty,
    /// The body is not covered by the signature (S3 only).
    Unsigned,
}

impl Payload {
    fn hash(&self) -> &'static str {
        match self {
            Self::Empty => EMPTY_PAYLOAD_SHA256,
            Self::Unsigned => UNSIGNED_PAYLOAD,
        }
    }
}

/// Request metadata required for presigning.
///
/// This trait captures all information needed to sign a request:
/// - HTTP method, URL, extra headers (request-specific)
/// - Region, service, expires, time (signing parameters)
pub trait Invocation {
    /// The HTTP method for this request.
    fn method(&self) -> &'static str;

    /// The URL for this request. Existing query parameters are signed.
    fn url(&self) -> &Url;

    /// The AWS region for signing (e.g., "us-east-1").
    fn region(&self) -> &str;

    /// The service name for signing (e.g., "sts").
    fn service(&self) -> &str;

    /// URL signature expiration in seconds.
    fn expires(&self) -> u64;

    /// Headers besides `host` that must be covered by the signature.
    fn headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Representation of the body in the canonical request.
    fn payload(&self) -> Payload {
        Payload::Empty
    }

    /// The timestamp for signing. Defaults to current time.
    fn time(&self) -> DateTime<Utc> {
        current_time()
    }
}

/// A presigned, time-boxed request descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedRequest {
    /// The presigned URL
    pub url: Url,
    /// HTTP method the signature is valid for
    pub method: String,
    /// Headers that were signed and must accompany the request
    pub headers: Vec<(String, String)>,
}

/// Presign `request` with `credentials`.
///
/// Derives the signing key on demand from the request's time, so no key
/// material outlives the call.
pub fn presign<I: Invocation>(
    credentials: &Credentials,
    request: &I,
) -> Result<PresignedRequest, SigningError> {
    if credentials.access_key_id().is_empty() || credentials.secret_access_key().is_empty() {
        return Err(SigningError::Credentials("access key pair is empty".into()));
    }

    let timestamp = request.time().format(TIMESTAMP_FORMAT).to_string();
    let date = &timestamp[0..8];

    let region = request.region();
    let service = request.service();

    let key = SigningKey::derive(credentials.secret_access_key(), date, region, service);
    let scope = format!("{}/{}/{}/{}", date, region, service, KEY_TYPE_IDENTIFIER);

    let url = request.url();
    let host = extract_host(url)?;

    // Build signed headers
    let mut headers = vec![(HOST_HEADER.to_string(), host)];
    for (name, value) in request.headers() {
        headers.push((name.to_ascii_lowercase(), value));
    }
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    let signed_headers: String = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    // Build query parameters
    let mut query_params: Vec<(String, String)> = vec![
        (ALGORITHM_QUERY_PARAM.into(), ALGORITHM_IDENTIFIER.into()),
        (
            CREDENTIAL_QUERY_PARAM.into(),
            format!("{}/{}", credentials.access_key_id(), scope),
        ),
        (AMZ_DATE_QUERY_PARAM.into(), timestamp.clone()),
        (EXPIRES_QUERY_PARAM.into(), request.expires().to_string()),
        (SIGNED_HEADERS_QUERY_PARAM.into(), signed_headers.clone()),
    ];

    if let Some(token) = credentials.session_token() {
        query_params.push((AMZ_SECURITY_TOKEN_QUERY_PARAM.into(), token.to_string()));
    }

    // Existing query parameters (e.g. Action=GetCallerIdentity) are signed too
    for (key, value) in url.query_pairs() {
        query_params.push((key.into_owned(), value.into_owned()));
    }

    // Sorted by key, then value
    query_params.sort();

    let canonical_uri = percent_encode_path(url.path());

    let canonical_query: String = query_params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{}:{}", k, collapse_whitespace(v)))
        .collect::<Vec<_>>()
        .join("\n");

    let canonical_request = format!(
        "{}\n{}\n{}\n{}\n\n{}\n{}",
        request.method(),
        canonical_uri,
        canonical_query,
        canonical_headers,
        signed_headers,
        request.payload().hash(),
    );

    let digest = Sha256::digest(canonical_request.as_bytes());
    let payload = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM_IDENTIFIER,
        timestamp,
        scope,
        hex_encode(&digest)
    );

    let signature = key.sign(payload.as_bytes());

    let mut url = url.clone();
    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        for (k, v) in &query_params {
            query.append_pair(k, v);
        }
        query.append_pair(AMZ_SIGNATURE_QUERY_PARAM, &signature.to_string());
    }

    Ok(PresignedRequest {
        url,
        method: request.method().to_string(),
        headers,
    })
}

/// AWS SigV4 signing key derived from credentials.
///
/// The key is derived through an HMAC chain:
/// `HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")`
struct SigningKey(Vec<u8>);

impl SigningKey {
    fn derive(secret: &str, date: &str, region: &str, service: &str) -> Self {
        let secret = format!("AWS4{}", secret);
        let k_date = Self::hmac(secret.as_bytes(), date.as_bytes());
        let k_region = Self::hmac(&k_date, region.as_bytes());
        let k_service = Self::hmac(&k_region, service.as_bytes());
        Self(Self::hmac(&k_service, KEY_TYPE_IDENTIFIER.as_bytes()))
    }

    fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any size");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }

    fn sign(&self, data: &[u8]) -> Signature {
        Signature(Self::hmac(&self.0, data))
    }
}

/// HMAC-SHA256 signature bytes.
struct Signature(Vec<u8>);

impl std::fmt::Display for Signature {
    /// Displays hex encoded representation of the signature
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex_encode(&self.0))
    }
}

/// Extract host string from URL, including port for non-standard ports.
pub(crate) fn extract_host(url: &Url) -> Result<String, SigningError> {
    let hostname = url
        .host_str()
        .ok_or_else(|| SigningError::InvalidEndpoint("URL missing host".into()))?;

    Ok(match url.port() {
        Some(port) => format!("{}:{}", hostname, port),
        None => hostname.to_string(),
    })
}

/// Trim a header value and reduce inner whitespace runs to one space.
fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}

/// Percent-encode a string per RFC 3986 (SigV4 flavour).
fn percent_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => result.push_str(&format!("%{:02X}", byte)),
        }
    }
    result
}

/// Percent-encode a URL path (preserving slashes).
fn percent_encode_path(path: &str) -> String {
    path.split('/')
        .map(percent_encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Get the current time as a UTC datetime.
pub fn current_time() -> DateTime<Utc> {
    Utc::now()
}
