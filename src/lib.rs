//! SteemConnect v2 OAuth 2.0 client—endpoint configuration, authorization-code and refresh-token
//! exchanges, and resource-owner mapping on top of the generic `oauth2` crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod token;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::Config, http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper,
		provider::Provider,
	};

	/// Provider type alias used by reqwest-backed integration tests.
	pub type ReqwestTestProvider = Provider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a configuration pointed at a mock server base URL.
	pub fn test_config(base_url: &str) -> Config {
		let mut config =
			Config::new("hernandev.app", "4c90e2e77840b97ac001b37236be966cf73ce1373f4b4b5a");

		config.set_base_url(base_url).set_return_url("https://return-to.me/callback");

		config
	}

	/// Constructs a [`Provider`] backed by the reqwest transport used across integration tests.
	pub fn build_test_provider(base_url: &str) -> ReqwestTestProvider {
		Provider::with_http_client(
			test_config(base_url),
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
