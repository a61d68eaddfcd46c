//! Internal facade over the generic `oauth2` client.
//!
//! The facade turns a [`Config`] plus a [`ProviderHooks`] implementation into
//! a configured `oauth2` client, drives the authorization-code and
//! refresh-token grants, and performs the bearer-authorized account lookup.
//! After every request the captured [`ResponseSnapshot`] is handed to the
//! response-error hook before any other result mapping, so SteemConnect's
//! non-RFC `{"error": "..."}` envelope always surfaces as an
//! [`IdentityProviderError`](crate::error::IdentityProviderError).

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
	EndpointNotSet, EndpointSet, ExtraTokenFields, HttpClientError, RedirectUrl, RefreshToken,
	RequestTokenError, Scope, StandardRevocableToken, StandardTokenResponse, TokenResponse,
	TokenUrl,
	basic::{
		BasicErrorResponse, BasicRequestTokenError, BasicRevocationErrorResponse,
		BasicTokenIntrospectionResponse, BasicTokenType,
	},
	http::header::{ACCEPT, AUTHORIZATION},
};
// self
use crate::{
	_prelude::*,
	config::Config,
	error::{ConfigError, IdentityProviderError, ResponseError},
	http::{ProviderHttpClient, ResponseSnapshot, ResponseSnapshotSlot},
	obs::FlowKind,
	provider::{AuthorizationRequest, ProviderHooks, resource_owner::ResourceOwner},
	token::AccessToken,
};
#[cfg(feature = "reqwest")] use crate::error::TransportError;

type SteemTokenResponse = StandardTokenResponse<SteemExtraTokenFields, BasicTokenType>;
type SteemClient<
	HasAuthUrl = EndpointNotSet,
	HasDeviceAuthUrl = EndpointNotSet,
	HasIntrospectionUrl = EndpointNotSet,
	HasRevocationUrl = EndpointNotSet,
	HasTokenUrl = EndpointNotSet,
> = oauth2::Client<
	BasicErrorResponse,
	SteemTokenResponse,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	BasicRevocationErrorResponse,
	HasAuthUrl,
	HasDeviceAuthUrl,
	HasIntrospectionUrl,
	HasRevocationUrl,
	HasTokenUrl,
>;
type ConfiguredClient =
	SteemClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Extra fields SteemConnect attaches to token responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct SteemExtraTokenFields {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub(crate) username: Option<String>,
}
impl ExtraTokenFields for SteemExtraTokenFields {}

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(
		&self,
		flow: FlowKind,
		snapshot: Option<&ResponseSnapshot>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		flow: FlowKind,
		snapshot: Option<&ResponseSnapshot>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(flow, snapshot, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => ResponseError::Unexpected {
				message: format!("HTTP client error occurred while calling the provider: {message}"),
				status: snapshot_status(snapshot),
			}
			.into(),
			_ => ResponseError::Unexpected {
				message: "HTTP client error occurred while calling the provider.".into(),
				status: snapshot_status(snapshot),
			}
			.into(),
		}
	}
}

pub(crate) struct GrantFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: ConfiguredClient,
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
	hooks: Arc<dyn ProviderHooks>,
}
impl<C, M> GrantFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn from_config(
		config: &Config,
		hooks: Arc<dyn ProviderHooks>,
		http_client: Arc<C>,
		transport_mapper: Arc<M>,
	) -> Result<Self> {
		let auth_url = AuthUrl::new(hooks.authorization_url(config))
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let token_url = TokenUrl::new(hooks.access_token_url(config))
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		// SC2 authenticates token requests via form-POSTed credentials.
		let mut oauth_client = SteemClient::new(ClientId::new(config.client_id().to_owned()))
			.set_client_secret(ClientSecret::new(config.client_secret().to_owned()))
			.set_auth_type(AuthType::RequestBody)
			.set_auth_uri(auth_url)
			.set_token_uri(token_url);

		if let Some(return_url) = config.return_url() {
			let redirect_url = RedirectUrl::new(return_url.to_owned())
				.map_err(|source| ConfigError::InvalidRedirect { source })?;

			oauth_client = oauth_client.set_redirect_uri(redirect_url);
		}

		Ok(Self { oauth_client, http_client, transport_mapper, hooks })
	}

	pub(crate) fn authorization_request(&self, config: &Config, state: String) -> AuthorizationRequest {
		let csrf_state = state.clone();
		let mut request = self.oauth_client.authorize_url(move || CsrfToken::new(csrf_state));

		for scope in self.hooks.default_scopes(config) {
			request = request.add_scope(Scope::new(scope));
		}

		let (url, _) = request.url();

		AuthorizationRequest::new(url, state)
	}

	pub(crate) async fn exchange_code(&self, code: &str) -> Result<AccessToken> {
		let slot = ResponseSnapshotSlot::default();
		let handle = self.http_client.with_snapshot(slot.clone());
		let result = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.request_async(&handle)
			.await;
		let snapshot = slot.take();

		self.check_snapshot(snapshot.as_ref())?;

		match result {
			Ok(response) => Ok(token_from_response(response)),
			Err(err) =>
				Err(self.map_request_error(FlowKind::AuthorizationCode, snapshot.as_ref(), err)),
		}
	}

	pub(crate) async fn exchange_refresh(&self, refresh_token: &str) -> Result<AccessToken> {
		let slot = ResponseSnapshotSlot::default();
		let handle = self.http_client.with_snapshot(slot.clone());
		let refresh_secret = RefreshToken::new(refresh_token.to_owned());
		let result =
			self.oauth_client.exchange_refresh_token(&refresh_secret).request_async(&handle).await;
		let snapshot = slot.take();

		self.check_snapshot(snapshot.as_ref())?;

		match result {
			Ok(response) => Ok(token_from_response(response)),
			Err(err) => Err(self.map_request_error(FlowKind::RefreshToken, snapshot.as_ref(), err)),
		}
	}

	pub(crate) async fn fetch_resource_owner(
		&self,
		config: &Config,
		token: &AccessToken,
	) -> Result<ResourceOwner> {
		let request = oauth2::http::Request::builder()
			.method(oauth2::http::Method::GET)
			.uri(self.hooks.resource_owner_url(config))
			.header(ACCEPT, "application/json")
			.header(AUTHORIZATION, format!("Bearer {}", token.access_token().expose()))
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let slot = ResponseSnapshotSlot::default();
		let handle = self.http_client.with_snapshot(slot.clone());
		let result = handle.call(request).await;
		let snapshot = slot.take();

		self.check_snapshot(snapshot.as_ref())?;
		result.map_err(|err| {
			self.transport_mapper.map_transport_error(
				FlowKind::ResourceOwner,
				snapshot.as_ref(),
				err,
			)
		})?;

		let status = snapshot_status(snapshot.as_ref());
		let body = snapshot.and_then(|snapshot| snapshot.body).ok_or_else(|| {
			ResponseError::Unexpected {
				message: "Account endpoint returned a non-JSON payload.".into(),
				status,
			}
		})?;

		Ok(self.hooks.resource_owner(body, token))
	}

	fn check_snapshot(&self, snapshot: Option<&ResponseSnapshot>) -> Result<()> {
		if let Some(snapshot) = snapshot {
			self.hooks.check_response(snapshot)?;
		}

		Ok(())
	}

	fn map_request_error(
		&self,
		flow: FlowKind,
		snapshot: Option<&ResponseSnapshot>,
		err: BasicRequestTokenError<HttpClientError<C::TransportError>>,
	) -> Error {
		match err {
			RequestTokenError::ServerResponse(response) => identity_error(snapshot, response),
			RequestTokenError::Request(error) =>
				self.transport_mapper.map_transport_error(flow, snapshot, error),
			RequestTokenError::Parse(source, _body) =>
				ResponseError::Parse { source, status: snapshot_status(snapshot) }.into(),
			RequestTokenError::Other(message) =>
				ResponseError::Unexpected { message, status: snapshot_status(snapshot) }.into(),
		}
	}
}

fn token_from_response(response: SteemTokenResponse) -> AccessToken {
	let mut token = AccessToken::new(response.access_token().secret().to_owned());

	if let Some(refresh) = response.refresh_token() {
		token = token.with_refresh_token(refresh.secret().to_owned());
	}
	if let Some(expires_in) = response.expires_in() {
		let secs = i64::try_from(expires_in.as_secs()).unwrap_or(i64::MAX);

		token = token.with_expires_in(Duration::seconds(secs));
	}
	if let Some(scopes) = response.scopes() {
		token = token.with_scopes(scopes.iter().map(|scope| scope.as_str()));
	}
	if let Some(username) = &response.extra_fields().username {
		token = token.with_username(username);
	}

	token
}

/// Fallback for error responses the snapshot missed; the response-error hook
/// has already run by the time this is reached.
fn identity_error(snapshot: Option<&ResponseSnapshot>, response: BasicErrorResponse) -> Error {
	let message = response
		.error_description()
		.cloned()
		.unwrap_or_else(|| response.error().as_ref().to_owned());
	let body = snapshot
		.and_then(|snapshot| snapshot.body.clone())
		.unwrap_or_else(|| serde_json::json!({ "error": response.error().as_ref() }));

	IdentityProviderError { message, code: 0, body }.into()
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(
	flow: FlowKind,
	snapshot: Option<&ResponseSnapshot>,
	err: ReqwestError,
) -> Error {
	let _ = flow;

	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return ResponseError::Unexpected {
			message: "Request timed out while calling the provider.".into(),
			status: snapshot_status(snapshot).or_else(|| err.status().map(|code| code.as_u16())),
		}
		.into();
	}

	TransportError::from(err).into()
}

fn snapshot_status(snapshot: Option<&ResponseSnapshot>) -> Option<u16> {
	snapshot.and_then(|snapshot| snapshot.status)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::provider::SteemConnectHooks;

	fn hooks() -> Arc<dyn ProviderHooks> {
		Arc::new(SteemConnectHooks::default())
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn facade_builds_from_default_config() {
		let config = Config::new("client-id", "client-secret");
		let result = <GrantFacade<crate::http::ReqwestHttpClient, ReqwestTransportErrorMapper>>::from_config(
			&config,
			hooks(),
			Arc::new(crate::http::ReqwestHttpClient::default()),
			Arc::new(ReqwestTransportErrorMapper),
		);

		assert!(result.is_ok());
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn facade_rejects_unparsable_endpoints() {
		let mut config = Config::new("client-id", "client-secret");

		config.set_base_url("not a url");

		let result = <GrantFacade<crate::http::ReqwestHttpClient, ReqwestTransportErrorMapper>>::from_config(
			&config,
			hooks(),
			Arc::new(crate::http::ReqwestHttpClient::default()),
			Arc::new(ReqwestTransportErrorMapper),
		);

		assert!(matches!(result, Err(Error::Config(ConfigError::InvalidEndpoint { .. }))));
	}

	#[test]
	fn extra_fields_tolerate_missing_username() {
		let fields: SteemExtraTokenFields = serde_json::from_str("{}")
			.expect("Extra token fields should deserialize from an empty object.");

		assert!(fields.username.is_none());

		let fields: SteemExtraTokenFields = serde_json::from_str("{\"username\":\"dummy-user\"}")
			.expect("Extra token fields should deserialize a username.");

		assert_eq!(fields.username.as_deref(), Some("dummy-user"));
	}
}
