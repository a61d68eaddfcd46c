//! Endpoint configuration for the SteemConnect v2 API.
//!
//! [`Config`] holds the client credentials, the return URL, the default scope
//! list, and the logical-endpoint map, and builds absolute URLs on demand via
//! [`Config::build_url`]. It performs no validation and no I/O; malformed
//! values surface later, when the grant facade turns them into `oauth2` inputs.

// self
use crate::_prelude::*;

/// Production SteemConnect v2 host used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://v2.steemconnect.com";

/// Default permission scopes requested during authorization.
///
/// `login` verifies the Steem identity, `vote` covers upvote/downvote/unvote,
/// and `comment` covers publishing or editing posts and comments. Callers that
/// need balance transfers or follow operations must request `custom_json`
/// explicitly via [`Config::set_scopes`].
pub const DEFAULT_SCOPES: [&str; 3] = ["login", "vote", "comment"];

/// Logical names for the fixed set of SteemConnect endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Endpoint {
	/// OAuth2 authorization endpoint; browser-facing, so no `api/` prefix.
	Authorization,
	/// OAuth2 endpoint exchanging access codes and refresh tokens for tokens.
	AccessToken,
	/// OAuth2 token revocation endpoint.
	Revoke,
	/// API endpoint returning the account which granted the application access.
	Account,
}
impl Endpoint {
	/// All logical endpoints, in map order.
	pub const ALL: [Endpoint; 4] =
		[Endpoint::Authorization, Endpoint::AccessToken, Endpoint::Revoke, Endpoint::Account];

	/// Returns the logical key used by [`Config::build_url`].
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Authorization => "authorization",
			Endpoint::AccessToken => "access_token",
			Endpoint::Revoke => "revoke",
			Endpoint::Account => "account",
		}
	}

	/// Resolves a logical key back to its endpoint, if the key is known.
	pub fn from_key(key: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|endpoint| endpoint.as_str() == key)
	}

	const fn default_path(self) -> &'static str {
		match self {
			Endpoint::Authorization => "oauth2/authorize",
			Endpoint::AccessToken => "api/oauth2/token",
			Endpoint::Revoke => "oauth2/token/revoke",
			Endpoint::Account => "api/me",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Mutable endpoint configuration shared by every provider operation.
///
/// Constructed once with the client id/secret pair; every other field starts
/// from the SteemConnect production defaults and stays overridable through the
/// chained setters for the lifetime of the value. Scope strings are opaque:
/// any value is accepted and forwarded verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
	client_id: String,
	client_secret: String,
	return_url: Option<String>,
	scopes: Vec<String>,
	base_url: String,
	endpoints: BTreeMap<Endpoint, String>,
}
impl Config {
	/// Creates a configuration for the provided client credentials.
	///
	/// The client id is the Steem account registered on the SteemConnect
	/// dashboard; the secret is issued alongside it.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			return_url: None,
			scopes: DEFAULT_SCOPES.iter().map(|scope| (*scope).to_owned()).collect(),
			base_url: DEFAULT_BASE_URL.into(),
			endpoints: Endpoint::ALL
				.into_iter()
				.map(|endpoint| (endpoint, endpoint.default_path().to_owned()))
				.collect(),
		}
	}

	/// Returns the configured client id.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Replaces the client id.
	pub fn set_client_id(&mut self, client_id: impl Into<String>) -> &mut Self {
		self.client_id = client_id.into();

		self
	}

	/// Returns the configured client secret.
	pub fn client_secret(&self) -> &str {
		&self.client_secret
	}

	/// Replaces the client secret.
	pub fn set_client_secret(&mut self, client_secret: impl Into<String>) -> &mut Self {
		self.client_secret = client_secret.into();

		self
	}

	/// Returns the return/callback URL, when one has been configured.
	///
	/// The value must match the URL registered on the SteemConnect dashboard.
	pub fn return_url(&self) -> Option<&str> {
		self.return_url.as_deref()
	}

	/// Sets the return/callback URL redirected to after authorization.
	pub fn set_return_url(&mut self, return_url: impl Into<String>) -> &mut Self {
		self.return_url = Some(return_url.into());

		self
	}

	/// Returns the scopes requested during authorization, in order.
	pub fn scopes(&self) -> &[String] {
		&self.scopes
	}

	/// Replaces the requested scope list.
	pub fn set_scopes<I, S>(&mut self, scopes: I) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Returns the base URL all endpoint URLs are built against.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Overrides the base URL, e.g. for a self-hosted SteemConnect install.
	pub fn set_base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
		self.base_url = base_url.into();

		self
	}

	/// Returns the relative path configured for a logical endpoint.
	pub fn endpoint(&self, endpoint: Endpoint) -> &str {
		self.endpoints.get(&endpoint).map(String::as_str).unwrap_or_default()
	}

	/// Overrides the relative path of a single logical endpoint.
	///
	/// The remaining endpoints keep their current paths.
	pub fn set_endpoint(&mut self, endpoint: Endpoint, path: impl Into<String>) -> &mut Self {
		self.endpoints.insert(endpoint, path.into());

		self
	}

	/// Returns the authorization endpoint path.
	pub fn authorization_endpoint(&self) -> &str {
		self.endpoint(Endpoint::Authorization)
	}

	/// Overrides the authorization endpoint path for custom installs.
	pub fn set_authorization_endpoint(&mut self, path: impl Into<String>) -> &mut Self {
		self.set_endpoint(Endpoint::Authorization, path)
	}

	/// Returns the access-token endpoint path.
	pub fn access_token_endpoint(&self) -> &str {
		self.endpoint(Endpoint::AccessToken)
	}

	/// Overrides the access-token endpoint path for custom installs.
	pub fn set_access_token_endpoint(&mut self, path: impl Into<String>) -> &mut Self {
		self.set_endpoint(Endpoint::AccessToken, path)
	}

	/// Returns the token revocation endpoint path.
	pub fn revoke_endpoint(&self) -> &str {
		self.endpoint(Endpoint::Revoke)
	}

	/// Overrides the token revocation endpoint path for custom installs.
	pub fn set_revoke_endpoint(&mut self, path: impl Into<String>) -> &mut Self {
		self.set_endpoint(Endpoint::Revoke, path)
	}

	/// Returns the account information endpoint path.
	pub fn account_endpoint(&self) -> &str {
		self.endpoint(Endpoint::Account)
	}

	/// Overrides the account information endpoint path for custom installs.
	pub fn set_account_endpoint(&mut self, path: impl Into<String>) -> &mut Self {
		self.set_endpoint(Endpoint::Account, path)
	}

	/// Builds an absolute URL from a logical endpoint key or a literal path.
	///
	/// When the input matches a known logical key the configured path is used;
	/// any other input is treated as a literal relative path, so callers may
	/// target arbitrary SteemConnect API routes. Exactly one `/` separates the
	/// base URL from the path regardless of slashes on either side. Pure
	/// string computation; never fails. An empty input yields the trimmed
	/// base URL followed by a single trailing slash.
	pub fn build_url(&self, endpoint: &str) -> String {
		let resolved = Endpoint::from_key(endpoint)
			.map(|endpoint| self.endpoint(endpoint))
			.unwrap_or(endpoint);

		format!("{}/{}", self.base_url.trim_matches('/'), resolved.trim_matches('/'))
	}
}
impl Debug for Config {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Config")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &!self.client_secret.is_empty())
			.field("return_url", &self.return_url)
			.field("scopes", &self.scopes)
			.field("base_url", &self.base_url)
			.field("endpoints", &self.endpoints)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config() -> Config {
		Config::new("dummy.id", "dummy.secret")
	}

	#[test]
	fn credentials_round_trip() {
		let mut config = config();

		assert_eq!(config.client_id(), "dummy.id");
		assert_eq!(config.client_secret(), "dummy.secret");

		config.set_client_id("custom.dummy.id").set_client_secret("custom.dummy.secret");

		assert_eq!(config.client_id(), "custom.dummy.id");
		assert_eq!(config.client_secret(), "custom.dummy.secret");
	}

	#[test]
	fn scopes_default_and_override() {
		let mut config = config();

		assert_eq!(config.scopes(), &["login", "vote", "comment"]);

		config.set_scopes(["login", "vote", "comment", "offline"]);

		assert_eq!(config.scopes(), &["login", "vote", "comment", "offline"]);
	}

	#[test]
	fn return_url_starts_unset() {
		let mut config = config();

		assert_eq!(config.return_url(), None);

		config.set_return_url("https://return.dummy.callback");

		assert_eq!(config.return_url(), Some("https://return.dummy.callback"));
	}

	#[test]
	fn base_url_default_and_override() {
		let mut config = config();

		assert_eq!(config.base_url(), "https://v2.steemconnect.com");

		config.set_base_url("https://custom.steem.connect");

		assert_eq!(config.base_url(), "https://custom.steem.connect");
	}

	#[test]
	fn endpoints_match_the_fixed_map() {
		let config = config();

		assert_eq!(config.authorization_endpoint(), "oauth2/authorize");
		assert_eq!(config.access_token_endpoint(), "api/oauth2/token");
		assert_eq!(config.revoke_endpoint(), "oauth2/token/revoke");
		assert_eq!(config.account_endpoint(), "api/me");
	}

	#[test]
	fn endpoint_override_leaves_others_unchanged() {
		let mut config = config();

		config.set_authorization_endpoint("authorize.custom");

		assert_eq!(config.authorization_endpoint(), "authorize.custom");
		assert_eq!(config.access_token_endpoint(), "api/oauth2/token");
		assert_eq!(config.revoke_endpoint(), "oauth2/token/revoke");
		assert_eq!(config.account_endpoint(), "api/me");

		config.set_access_token_endpoint("token.custom");
		config.set_revoke_endpoint("revoke.custom");
		config.set_account_endpoint("account.custom");

		assert_eq!(config.access_token_endpoint(), "token.custom");
		assert_eq!(config.revoke_endpoint(), "revoke.custom");
		assert_eq!(config.account_endpoint(), "account.custom");
	}

	#[test]
	fn build_url_trims_exactly_one_slash_boundary() {
		let mut config = config();

		config.set_base_url("https://custom.url/").set_authorization_endpoint("/custom/auth/");

		assert_eq!(config.build_url("authorization"), "https://custom.url/custom/auth");
	}

	#[test]
	fn build_url_resolves_every_logical_key() {
		let config = config();

		assert_eq!(
			config.build_url("authorization"),
			"https://v2.steemconnect.com/oauth2/authorize"
		);
		assert_eq!(config.build_url("access_token"), "https://v2.steemconnect.com/api/oauth2/token");
		assert_eq!(config.build_url("revoke"), "https://v2.steemconnect.com/oauth2/token/revoke");
		assert_eq!(config.build_url("account"), "https://v2.steemconnect.com/api/me");
	}

	#[test]
	fn build_url_falls_through_to_literal_paths() {
		let config = config();

		assert_eq!(
			config.build_url("api/broadcast"),
			"https://v2.steemconnect.com/api/broadcast"
		);
		assert_eq!(config.build_url(""), "https://v2.steemconnect.com/");
	}

	#[test]
	fn debug_redacts_the_client_secret() {
		let rendered = format!("{:?}", config());

		assert!(!rendered.contains("dummy.secret"));
		assert!(rendered.contains("client_secret_set: true"));
	}
}
