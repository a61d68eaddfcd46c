//! Resource-owner view over the raw SteemConnect account payload.

// crates.io
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// Authenticated Steem account on whose behalf the application acts.
///
/// Holds the raw account payload returned by the account endpoint. Some
/// deployments wrap the account object in an `account` envelope key and some
/// return it bare; construction unwraps the envelope when present so both
/// shapes yield the same view. Immutable after construction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceOwner {
	account: Map<String, Value>,
}
impl ResourceOwner {
	/// Builds a resource owner from an account response body.
	///
	/// A top-level `account` object takes precedence over the body itself;
	/// non-object input yields an empty view rather than an error.
	pub fn from_value(body: Value) -> Self {
		let account = match body {
			Value::Object(mut object) => match object.remove("account") {
				Some(Value::Object(nested)) => nested,
				_ => object,
			},
			_ => Map::new(),
		};

		Self { account }
	}

	/// Returns the account identity.
	///
	/// On SteemConnect the id of a resource owner is the account name itself,
	/// without the `@` sign.
	pub fn id(&self) -> Option<&str> {
		self.get("name").and_then(Value::as_str)
	}

	/// Looks up an arbitrary account attribute; `None` for missing keys.
	pub fn get(&self, attribute: &str) -> Option<&Value> {
		self.account.get(attribute)
	}

	/// Borrows the quasi-unparsed account data.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.account
	}

	/// Consumes the view and returns the quasi-unparsed account data.
	pub fn into_inner(self) -> Map<String, Value> {
		self.account
	}
}
