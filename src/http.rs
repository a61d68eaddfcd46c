//! Transport primitives for token exchanges and account lookups.
//!
//! The module exposes [`ProviderHttpClient`] alongside [`ResponseSnapshot`] and
//! [`ResponseSnapshotSlot`] so downstream crates can integrate custom HTTP
//! clients without losing the response-error hook. Implementations call
//! [`ResponseSnapshotSlot::take`] before dispatching a request and
//! [`ResponseSnapshotSlot::store`] once the response status and body are known,
//! enabling the hook to inspect payloads the generic `oauth2` client would
//! otherwise swallow (SteemConnect reports failures through an `error` body
//! field rather than the RFC 6749 envelope).

// std
use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use serde_json::Value;
// self
use crate::_prelude::*;

/// Abstraction over HTTP transports capable of executing token exchanges and
/// bearer-authorized account lookups while publishing response snapshots.
///
/// The trait is the crate's only dependency on an HTTP stack. Callers provide
/// an implementation (typically behind `Arc<T>` where `T: ProviderHttpClient`)
/// and the provider requests short-lived [`AsyncHttpClient`] handles that each
/// carry a clone of a [`ResponseSnapshotSlot`]. Implementations must be
/// `Send + Sync + 'static` so one transport can serve several provider
/// instances, and the handles they return must own whatever state is required
/// so their request futures remain `Send` for the lifetime of the in-flight
/// operation.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`ResponseSnapshotSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle that records outcomes in `slot`.
	///
	/// # Snapshot Contract
	///
	/// - Call [`ResponseSnapshotSlot::take`] before submitting the HTTP request so stale
	///   information never leaks across attempts.
	/// - Once a response arrives, store its status and (when the payload decodes as JSON) its
	///   parsed body with [`ResponseSnapshotSlot::store`].
	/// - Never retain the slot clone beyond the lifetime of the returned handle.
	fn with_snapshot(&self, slot: ResponseSnapshotSlot) -> Self::Handle;
}

/// Captured status and parsed body of the most recent HTTP response.
#[derive(Clone, Debug, Default)]
pub struct ResponseSnapshot {
	/// HTTP status code returned by the endpoint, if available.
	pub status: Option<u16>,
	/// Response body parsed as JSON, when the payload decodes.
	pub body: Option<Value>,
}

/// Thread-safe slot for sharing [`ResponseSnapshot`] between the transport and
/// the response-error hook.
///
/// The grant facade creates a fresh slot for each request and reads the
/// captured snapshot immediately after the transport resolves. Transport
/// implementations borrow the slot just long enough to call
/// [`store`](ResponseSnapshotSlot::store) and must keep ownership with the
/// facade.
#[derive(Clone, Debug, Default)]
pub struct ResponseSnapshotSlot(Arc<Mutex<Option<ResponseSnapshot>>>);
impl ResponseSnapshotSlot {
	/// Stores a new snapshot for the current request.
	pub fn store(&self, snapshot: ResponseSnapshot) {
		*self.0.lock() = Some(snapshot);
	}

	/// Returns the captured snapshot, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseSnapshot> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one
/// place. Token requests should not follow redirects, matching OAuth 2.0
/// guidance that token endpoints return results directly; configure any custom
/// [`ReqwestClient`] accordingly, because the provider passes this client into
/// the `oauth2` crate when it builds the facade layer.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds an instrumented HTTP client that captures response snapshots.
	pub(crate) fn instrumented(&self, slot: ResponseSnapshotSlot) -> InstrumentedHandle {
		InstrumentedHandle::new(self.0.clone(), slot)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

#[cfg(feature = "reqwest")]
/// Instrumented adapter that implements [`AsyncHttpClient`] for reqwest.
pub(crate) struct InstrumentedHttpClient {
	client: ReqwestClient,
	slot: ResponseSnapshotSlot,
}
#[cfg(feature = "reqwest")]
impl InstrumentedHttpClient {
	fn new(client: ReqwestClient, slot: ResponseSnapshotSlot) -> Self {
		Self { client, slot }
	}
}

#[cfg(feature = "reqwest")]
/// Public handle returned by [`ReqwestHttpClient`] that satisfies [`ProviderHttpClient`].
#[derive(Clone)]
pub struct InstrumentedHandle(Arc<InstrumentedHttpClient>);
#[cfg(feature = "reqwest")]
impl InstrumentedHandle {
	fn new(client: ReqwestClient, slot: ResponseSnapshotSlot) -> Self {
		Self(Arc::new(InstrumentedHttpClient::new(client, slot)))
	}
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			client.slot.take();

			let response = client
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let bytes = response.bytes().await.map_err(Box::new)?.to_vec();

			client.slot.store(ResponseSnapshot {
				status: Some(status.as_u16()),
				body: parse_body(&bytes),
			});

			let mut response_new = HttpResponse::new(bytes);

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	type Handle = InstrumentedHandle;
	type TransportError = ReqwestError;

	fn with_snapshot(&self, slot: ResponseSnapshotSlot) -> Self::Handle {
		self.instrumented(slot)
	}
}

#[cfg(feature = "reqwest")]
fn parse_body(bytes: &[u8]) -> Option<Value> {
	serde_json::from_slice(bytes).ok()
}
