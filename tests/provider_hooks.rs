#![cfg(feature = "reqwest")]

// std
use std::collections::HashMap;
// self
use steemconnect_oauth2::{
	config::Config,
	error::{ConfigError, Error},
	provider::{ProviderHooks, ReqwestProvider, SteemConnectHooks},
};

fn build_test_provider(base_url: &str) -> ReqwestProvider {
	let mut config =
		Config::new("hernandev.app", "4c90e2e77840b97ac001b37236be966cf73ce1373f4b4b5a");

	config.set_base_url(base_url).set_return_url("https://return-to.me/callback");

	ReqwestProvider::new(config)
}

#[test]
fn provider_hooks_follow_the_config() {
	let provider = build_test_provider("https://v2.steemconnect.com");
	let config = &provider.config;

	assert_eq!(provider.hooks.authorization_url(config), config.build_url("authorization"));
	assert_eq!(provider.hooks.access_token_url(config), config.build_url("access_token"));
	assert_eq!(provider.hooks.resource_owner_url(config), config.build_url("account"));
	assert_eq!(provider.hooks.default_scopes(config), config.scopes());
}

#[test]
fn default_scopes_track_config_overrides() {
	let mut provider = build_test_provider("https://v2.steemconnect.com");

	provider.config.set_scopes(["login", "comment"]);

	assert_eq!(
		provider.hooks.default_scopes(&provider.config),
		vec!["login".to_owned(), "comment".to_owned()]
	);
}

#[test]
fn authorize_url_carries_the_configured_parameters() {
	let provider = build_test_provider("https://v2.steemconnect.com");
	let request = provider.authorize_url().expect("Authorize URL should build successfully.");
	let pairs: HashMap<_, _> = request.url.query_pairs().into_owned().collect();

	assert!(request.url.as_str().starts_with("https://v2.steemconnect.com/oauth2/authorize"));
	assert_eq!(pairs.get("response_type"), Some(&"code".into()));
	assert_eq!(pairs.get("client_id"), Some(&"hernandev.app".into()));
	assert_eq!(pairs.get("redirect_uri"), Some(&"https://return-to.me/callback".into()));
	assert_eq!(pairs.get("scope"), Some(&"login vote comment".into()));
	assert_eq!(pairs.get("state"), Some(&request.state));
	assert_eq!(request.state.len(), 32);
	assert!(request.validate_state(&request.state).is_ok());
}

#[test]
fn authorize_url_reflects_scope_overrides() {
	let mut provider = build_test_provider("https://v2.steemconnect.com");

	provider.config.set_scopes(["login", "offline"]);

	let request = provider.authorize_url().expect("Authorize URL should build successfully.");
	let pairs: HashMap<_, _> = request.url.query_pairs().into_owned().collect();

	assert_eq!(pairs.get("scope"), Some(&"login offline".into()));
}

#[test]
fn authorize_url_requires_a_return_url() {
	let provider = ReqwestProvider::new(Config::new("hernandev.app", "some.secret"));
	let err = provider
		.authorize_url()
		.expect_err("Authorize URL must not build without a return URL.");

	assert!(matches!(err, Error::Config(ConfigError::MissingReturnUrl)));
}

#[test]
fn custom_hooks_replace_the_defaults() {
	let provider = build_test_provider("https://v2.steemconnect.com")
		.with_hooks(SteemConnectHooks::default().with_response_code_field("response_code"));

	assert_eq!(provider.hooks.response_code_field(), Some("response_code"));
}
