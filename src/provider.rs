//! SteemConnect identity provider built from composition.
//!
//! [`Provider`] wires a [`Config`] and a [`ProviderHooks`] implementation
//! into the generic grant facade and exposes the public operations: building
//! the browser authorize URL, exchanging a returned access code, refreshing
//! tokens, and resolving the resource owner. The provider itself holds no
//! token state; every call is independent.

pub mod hooks;
pub mod resource_owner;

pub use hooks::*;
pub use resource_owner::*;

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	config::Config,
	error::ConfigError,
	http::ProviderHttpClient,
	oauth::{GrantFacade, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	token::AccessToken,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

const STATE_LEN: usize = 32;

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport stack.
pub type ReqwestProvider = Provider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// SteemConnect v2 identity provider.
///
/// The provider owns the endpoint configuration, the HTTP transport, and the
/// hook implementations so individual operations can focus on grant-specific
/// logic. The configuration stays reachable through the public field: scope
/// and endpoint overrides applied after construction are observed by every
/// subsequent call, because the grant facade is rebuilt per operation.
#[derive(Clone)]
pub struct Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Endpoint configuration driving every operation.
	pub config: Config,
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Hook implementations consumed by the grant facade.
	pub hooks: Arc<dyn ProviderHooks>,
}
impl<C, M> Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a provider that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: Config,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			config,
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			hooks: Arc::new(SteemConnectHooks::default()),
		}
	}

	/// Replaces the hook implementations consumed by the grant facade.
	pub fn with_hooks<H>(mut self, hooks: H) -> Self
	where
		H: 'static + ProviderHooks,
	{
		self.hooks = Arc::new(hooks);

		self
	}

	/// Builds the browser authorization URL for the configured scopes.
	///
	/// The URL carries `response_type=code`, the client id, the configured
	/// return URL, the scopes resolved through the default-scopes hook, and a
	/// freshly generated alphanumeric `state`. Fails with
	/// [`ConfigError::MissingReturnUrl`] when no return URL is configured,
	/// since the authorization redirect would have nowhere to go.
	pub fn authorize_url(&self) -> Result<AuthorizationRequest> {
		if self.config.return_url().is_none() {
			return Err(ConfigError::MissingReturnUrl.into());
		}

		Ok(self.facade()?.authorization_request(&self.config, random_state(STATE_LEN)))
	}

	/// Parses a return from the authorization flow into an access token.
	///
	/// The code is passed explicitly; HTTP handlers extract it from their
	/// framework's request type (or use [`parse_return_url`](Self::parse_return_url)).
	/// `None` yields `Ok(None)` without issuing a request. Any error raised by
	/// the exchange, including the response-error hook, propagates unchanged.
	pub async fn parse_return(&self, code: Option<&str>) -> Result<Option<AccessToken>> {
		const KIND: FlowKind = FlowKind::AuthorizationCode;

		let Some(code) = code else {
			return Ok(None);
		};
		let span = FlowSpan::new(KIND, "parse_return");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(async move { self.facade()?.exchange_code(code).await }).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result.map(Some)
	}

	/// Convenience wrapper that extracts the `code` query parameter from a
	/// callback URL before delegating to [`parse_return`](Self::parse_return).
	pub async fn parse_return_url(&self, url: &Url) -> Result<Option<AccessToken>> {
		let code =
			url.query_pairs().find_map(|(key, value)| (key == "code").then(|| value.into_owned()));

		self.parse_return(code.as_deref()).await
	}

	/// Issues a new access token from the refresh secret of `current`.
	///
	/// Not every issued token carries a refresh secret; when it is absent the
	/// method returns `Ok(None)` without issuing a request instead of trying
	/// the refresh flow.
	pub async fn refresh_token(&self, current: &AccessToken) -> Result<Option<AccessToken>> {
		let Some(refresh_token) = current.refresh_token() else {
			return Ok(None);
		};

		self.refresh_token_string(refresh_token.expose()).await.map(Some)
	}

	/// Issues a new access token from a raw refresh token string.
	///
	/// Errors propagate exactly as for [`parse_return`](Self::parse_return).
	pub async fn refresh_token_string(&self, refresh_token: &str) -> Result<AccessToken> {
		const KIND: FlowKind = FlowKind::RefreshToken;

		let span = FlowSpan::new(KIND, "refresh_token_string");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move { self.facade()?.exchange_refresh(refresh_token).await })
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Fetches the account which granted the application access.
	///
	/// Issues a bearer-authorized GET against the account endpoint, runs the
	/// response-error hook, and maps the body through the resource-owner
	/// construction hook.
	pub async fn resource_owner(&self, token: &AccessToken) -> Result<ResourceOwner> {
		const KIND: FlowKind = FlowKind::ResourceOwner;

		let span = FlowSpan::new(KIND, "resource_owner");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(
				async move { self.facade()?.fetch_resource_owner(&self.config, token).await },
			)
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn facade(&self) -> Result<GrantFacade<C, M>> {
		GrantFacade::from_config(
			&self.config,
			self.hooks.clone(),
			self.http_client.clone(),
			self.transport_mapper.clone(),
		)
	}
}
#[cfg(feature = "reqwest")]
impl Provider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a provider for the given configuration.
	///
	/// The provider provisions its own reqwest-backed transport so callers do
	/// not need to pass HTTP handles explicitly.
	pub fn new(config: Config) -> Self {
		Self::with_http_client(
			config,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Debug for Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Provider").field("config", &self.config).finish()
	}
}

/// Browser authorization request produced by [`Provider::authorize_url`].
#[derive(Clone, Debug)]
pub struct AuthorizationRequest {
	/// Fully-formed authorize URL end-users should be sent to.
	pub url: Url,
	/// Opaque state value that must round-trip via the redirect handler.
	pub state: String,
}
impl AuthorizationRequest {
	pub(crate) fn new(url: Url, state: String) -> Self {
		Self { url, state }
	}

	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(Error::StateMismatch) }
	}
}

fn random_state(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn state_validation_errors_on_mismatch() {
		let request = AuthorizationRequest::new(
			Url::parse("https://v2.steemconnect.com/oauth2/authorize?state=abc")
				.expect("Authorize URL fixture should parse successfully."),
			"expected".into(),
		);

		assert!(request.validate_state("expected").is_ok());

		let err = request.validate_state("other").expect_err("State mismatch should fail.");

		assert!(matches!(err, Error::StateMismatch));
	}

	#[test]
	fn random_state_is_alphanumeric() {
		let state = random_state(STATE_LEN);

		assert_eq!(state.len(), STATE_LEN);
		assert!(state.chars().all(|ch| ch.is_ascii_alphanumeric()));
	}
}
