//! Error types shared across the provider, facade, and transport layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Provider response body carried a non-empty `error` field.
	#[error(transparent)]
	IdentityProvider(#[from] IdentityProviderError),
	/// Local configuration problem surfaced at exchange time.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider returned a response the crate could not interpret.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// Transport failure (DNS, TCP, TLS), propagated unwrapped.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Returned `state` did not match the value issued with the authorize URL.
	#[error("Authorization state mismatch.")]
	StateMismatch,
}

/// Error raised by the response-error hook when a token or account response
/// body contains a non-empty `error` value.
///
/// Raised synchronously right after the response is parsed, before control
/// returns to the caller. The numeric code resolves from the hook's
/// response-code field when the body provides one and defaults to `0`
/// otherwise; the raw body is retained for caller inspection.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("{message}")]
pub struct IdentityProviderError {
	/// Provider-supplied error message.
	pub message: String,
	/// Numeric code resolved from the response body, `0` when absent.
	pub code: i64,
	/// Raw response body as received from the provider.
	pub body: serde_json::Value,
}

/// Configuration and validation failures.
///
/// The configuration layer performs no upfront validation, so these surface
/// from the grant facade once a value is actually consumed.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A configured endpoint does not form a valid absolute URL.
	#[error("Configured endpoint does not form a valid URL.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Configured return URL cannot be parsed.
	#[error("Configured return URL is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Operation requires a return URL but none is configured.
	#[error("No return URL is configured.")]
	MissingReturnUrl,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures interpreting an otherwise delivered provider response.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Endpoint responded with JSON that could not be parsed.
	#[error("Endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Endpoint returned an unexpected payload or the client failed oddly.
	#[error("Endpoint returned an unexpected response: {message}")]
	Unexpected {
		/// Message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identity_provider_error_displays_the_message() {
		let err = IdentityProviderError {
			message: "invalid-access-code".into(),
			code: 0,
			body: serde_json::json!({ "error": "invalid-access-code" }),
		};

		assert_eq!(err.to_string(), "invalid-access-code");

		let err = Error::from(err);

		assert_eq!(err.to_string(), "invalid-access-code");
	}
}
