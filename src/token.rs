//! Issued-token model and the redacted secret wrapper.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Access token issued by the SteemConnect token endpoint.
///
/// Carries the bearer secret, the optional refresh secret, expiry instants,
/// the raw scope list echoed by the provider, and the `username` field
/// SteemConnect attaches to token responses to identify the resource owner.
/// Not every issued token carries a refresh secret; callers should treat
/// [`refresh_token`](Self::refresh_token) as genuinely optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	access_token: TokenSecret,
	refresh_token: Option<TokenSecret>,
	issued_at: OffsetDateTime,
	expires_at: Option<OffsetDateTime>,
	username: Option<String>,
	scopes: Vec<String>,
}
impl AccessToken {
	/// Creates a token holding the provided bearer secret, issued now.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			issued_at: OffsetDateTime::now_utc(),
			expires_at: None,
			username: None,
			scopes: Vec::new(),
		}
	}

	/// Attaches a refresh secret.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(refresh_token));

		self
	}

	/// Overrides the issued-at instant.
	pub fn with_issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = instant;

		self
	}

	/// Sets an absolute expiry instant.
	pub fn with_expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	///
	/// Durations that overflow the representable time range leave the expiry
	/// unset.
	pub fn with_expires_in(mut self, duration: Duration) -> Self {
		self.expires_at = self.issued_at.checked_add(duration);

		self
	}

	/// Sets the resource-owner username echoed by the token endpoint.
	pub fn with_username(mut self, username: impl Into<String>) -> Self {
		self.username = Some(username.into());

		self
	}

	/// Sets the raw scope list echoed by the token endpoint.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Bearer secret; callers must avoid logging it.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Refresh secret, if the provider issued one.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// Instant the token was issued at, recorded locally.
	pub fn issued_at(&self) -> OffsetDateTime {
		self.issued_at
	}

	/// Expiry instant, when the provider reported one.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Resource-owner username, when the token endpoint echoed one.
	pub fn username(&self) -> Option<&str> {
		self.username.as_deref()
	}

	/// Raw scopes echoed by the token endpoint, in response order.
	pub fn scopes(&self) -> &[String] {
		&self.scopes
	}

	/// Returns `true` when the token has expired at the provided instant.
	///
	/// Tokens without a reported expiry never count as expired.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Returns `true` when the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
