//! Provider hooks consumed by the grant facade.
//!
//! [`ProviderHooks`] is the small capability interface the generic grant
//! machinery calls back into: endpoint URL resolution, default scopes, the
//! response-error check, and resource-owner construction. The default method
//! bodies implement the SteemConnect behavior, so [`SteemConnectHooks`] only
//! overrides what deployments actually vary.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	config::{Config, Endpoint},
	error::IdentityProviderError,
	http::ResponseSnapshot,
	provider::resource_owner::ResourceOwner,
	token::AccessToken,
};

/// Hook interface that adapts a [`Config`] into the inputs the grant facade
/// needs, and maps provider response shapes into domain values.
///
/// Implementors are required to be `Send + Sync`. Override only what you
/// need; every method has a default implementation covering stock
/// SteemConnect deployments.
pub trait ProviderHooks: Send + Sync {
	/// Absolute authorization URL end-users are sent to.
	fn authorization_url(&self, config: &Config) -> String {
		config.build_url(Endpoint::Authorization.as_str())
	}

	/// Absolute token endpoint URL used for code and refresh exchanges.
	fn access_token_url(&self, config: &Config) -> String {
		config.build_url(Endpoint::AccessToken.as_str())
	}

	/// Absolute account endpoint URL used for resource-owner lookups.
	fn resource_owner_url(&self, config: &Config) -> String {
		config.build_url(Endpoint::Account.as_str())
	}

	/// Scopes requested during authorization, read live from the config.
	fn default_scopes(&self, config: &Config) -> Vec<String> {
		config.scopes().to_vec()
	}

	/// Body field consulted for a numeric error code, when the deployment
	/// provides one. `None` resolves every error code to `0`.
	fn response_code_field(&self) -> Option<&str> {
		None
	}

	/// Response-error check executed after every token/account request,
	/// before control returns to the caller.
	///
	/// Fails when the parsed body carries a non-empty `error` value. The
	/// error message is that value; the code resolves from
	/// [`response_code_field`](Self::response_code_field) and defaults to
	/// `0`; the raw body rides along for caller inspection.
	fn check_response(&self, snapshot: &ResponseSnapshot) -> Result<(), IdentityProviderError> {
		let Some(body) = &snapshot.body else {
			return Ok(());
		};
		let Some(message) = non_empty(body.get("error")) else {
			return Ok(());
		};
		let code = self
			.response_code_field()
			.and_then(|field| non_empty(body.get(field)))
			.and_then(|value| value.parse().ok())
			.unwrap_or(0);

		Err(IdentityProviderError { message, code, body: body.clone() })
	}

	/// Builds the resource-owner view from the parsed account response body.
	fn resource_owner(&self, body: Value, token: &AccessToken) -> ResourceOwner {
		let _ = token;

		ResourceOwner::from_value(body)
	}
}

/// Stock hook implementation for SteemConnect deployments.
#[derive(Clone, Debug, Default)]
pub struct SteemConnectHooks {
	/// Body field consulted for a numeric error code, when set.
	pub response_code_field: Option<String>,
}
impl SteemConnectHooks {
	/// Sets the body field consulted for a numeric error code.
	pub fn with_response_code_field(mut self, field: impl Into<String>) -> Self {
		self.response_code_field = Some(field.into());

		self
	}
}
impl ProviderHooks for SteemConnectHooks {
	fn response_code_field(&self) -> Option<&str> {
		self.response_code_field.as_deref()
	}
}

fn non_empty(value: Option<&Value>) -> Option<String> {
	match value? {
		Value::Null | Value::Bool(false) => None,
		Value::String(text) if text.is_empty() => None,
		Value::Number(number) if number.as_i64() == Some(0) => None,
		Value::Array(values) if values.is_empty() => None,
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		other => Some(other.to_string()),
	}
}
