//! Retrieving remote documents and contexts (spec §1, the "document loader"
//! collaborator interface).
use crate::json;
use crate::media_type::Profile;
use hashbrown::HashSet;
use iref::{Iri, IriBuf};
use mime::Mime;
use std::collections::HashMap;

/// A loaded document together with the response metadata the algorithms
/// need: its final URL after redirection, content type, an out-of-band
/// context link, and any `profile` parameter values.
#[derive(Debug, Clone)]
pub struct RemoteDocument<T = json::Value> {
	pub url: Option<IriBuf>,
	pub content_type: Option<Mime>,
	pub context_url: Option<IriBuf>,
	pub profile: HashSet<Profile>,
	pub document: T,
}

impl<T> RemoteDocument<T> {
	pub fn new(url: Option<IriBuf>, content_type: Option<Mime>, document: T) -> Self {
		Self {
			url,
			content_type,
			context_url: None,
			profile: HashSet::new(),
			document,
		}
	}

	pub fn document(&self) -> &T {
		&self.document
	}

	pub fn into_document(self) -> T {
		self.document
	}

	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteDocument<U> {
		RemoteDocument {
			url: self.url,
			content_type: self.content_type,
			context_url: self.context_url,
			profile: self.profile,
			document: f(self.document),
		}
	}
}

pub type LoadErrorCause = Box<dyn std::error::Error + Send + Sync>;

/// A failure to retrieve or parse a document (spec §7 `loading document
/// failed` / `loading remote context failed`).
#[derive(Debug, thiserror::Error)]
#[error("loading document `{target}` failed: {cause}")]
pub struct LoadError {
	pub target: IriBuf,
	pub cause: LoadErrorCause,
}

impl LoadError {
	pub fn new(target: IriBuf, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
		Self {
			target,
			cause: Box::new(cause),
		}
	}
}

pub type LoadingResult = Result<RemoteDocument, LoadError>;

/// Loads the document behind an IRI. Implemented for the built-in
/// [`NoLoader`]/[`MapLoader`]/[`FsLoader`] loaders and, behind the
/// `reqwest` feature, [`reqwest_loader::ReqwestLoader`].
pub trait Loader {
	#[allow(async_fn_in_trait)]
	async fn load(&self, url: &Iri) -> LoadingResult;
}

impl<L: Loader> Loader for &L {
	async fn load(&self, url: &Iri) -> LoadingResult {
		L::load(self, url).await
	}
}

/// A reference to a remote document: either its IRI, to be resolved through
/// a [`Loader`], or content already in hand.
#[derive(Clone, Debug)]
pub enum RemoteDocumentReference<T = json::Value> {
	Iri(IriBuf),
	Loaded(RemoteDocument<T>),
}

impl RemoteDocumentReference<json::Value> {
	pub fn iri(iri: IriBuf) -> Self {
		Self::Iri(iri)
	}

	pub async fn load_with(self, loader: &impl Loader) -> LoadingResult {
		match self {
			Self::Iri(iri) => loader.load(&iri).await,
			Self::Loaded(doc) => Ok(doc),
		}
	}
}

/// Dummy loader that refuses every request (spec §1 "a loader that does
/// not support loading documents is valid" for processors with no remote
/// context support).
#[derive(Debug, Default)]
pub struct NoLoader;

#[derive(Debug, thiserror::Error)]
#[error("cannot load `{0}`, no document loader configured")]
pub struct CannotLoad(pub IriBuf);

impl Loader for NoLoader {
	async fn load(&self, url: &Iri) -> LoadingResult {
		Err(LoadError::new(url.to_owned(), CannotLoad(url.to_owned())))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("document `{0}` not found")]
pub struct EntryNotFound(pub IriBuf);

/// A loader backed by a fixed in-memory map of IRI to document, useful for
/// tests and for embedding well-known contexts.
#[derive(Debug, Clone, Default)]
pub struct MapLoader(HashMap<IriBuf, RemoteDocument>);

impl MapLoader {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, iri: IriBuf, document: RemoteDocument) -> &mut Self {
		self.0.insert(iri, document);
		self
	}
}

impl Loader for MapLoader {
	async fn load(&self, url: &Iri) -> LoadingResult {
		match self.0.get(url) {
			Some(document) => Ok(document.clone()),
			None => Err(LoadError::new(url.to_owned(), EntryNotFound(url.to_owned()))),
		}
	}
}

/// Loads documents from the local file system by mapping IRI prefixes to
/// directories. Not cached: every `load` re-reads the file.
#[derive(Debug, Default)]
pub struct FsLoader {
	mount_points: Vec<(IriBuf, std::path::PathBuf)>,
}

#[derive(Debug, thiserror::Error)]
pub enum FsLoadError {
	#[error("no mount point for this IRI")]
	NoMountPoint,
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	Parse(#[from] json::ParseError),
}

impl FsLoader {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn mount(&mut self, prefix: IriBuf, path: impl Into<std::path::PathBuf>) -> &mut Self {
		self.mount_points.push((prefix, path.into()));
		self
	}

	fn filepath(&self, url: &Iri) -> Option<std::path::PathBuf> {
		for (prefix, dir) in &self.mount_points {
			if let Some(rest) = url.as_str().strip_prefix(prefix.as_str()) {
				let mut path = dir.clone();
				for segment in rest.trim_start_matches('/').split('/').filter(|s| !s.is_empty()) {
					path.push(segment);
				}
				return Some(path);
			}
		}
		None
	}
}

impl Loader for FsLoader {
	async fn load(&self, url: &Iri) -> LoadingResult {
		let wrap = |e: FsLoadError| LoadError::new(url.to_owned(), e);
		let path = self.filepath(url).ok_or_else(|| wrap(FsLoadError::NoMountPoint))?;
		let contents = std::fs::read_to_string(&path).map_err(|e| wrap(FsLoadError::Io(e)))?;
		let value = json::parse_str(&contents).map_err(|e| wrap(FsLoadError::Parse(e)))?;
		Ok(RemoteDocument::new(
			Some(url.to_owned()),
			Some("application/ld+json".parse().expect("valid mime type")),
			value,
		))
	}
}

#[cfg(feature = "reqwest")]
pub mod reqwest_loader {
	//! `reqwest`-based loader, following HTTP redirects and `Link` headers
	//! carrying the `http://www.w3.org/ns/json-ld#context` relation (spec
	//! §1 "IRI resolution" note on remote context retrieval).
	use super::{json, LoadError, LoadingResult, Loader, RemoteDocument};
	use iref::Iri;
	use reqwest::header::{ACCEPT, CONTENT_TYPE};
	use reqwest_middleware::ClientWithMiddleware;

	#[derive(Debug, thiserror::Error)]
	pub enum Error {
		#[error("http request failed: {0}")]
		Reqwest(#[from] reqwest_middleware::Error),
		#[error("query failed: status code {0}")]
		QueryFailed(reqwest::StatusCode),
		#[error("invalid or missing content type")]
		InvalidContentType,
		#[error(transparent)]
		Parse(#[from] json::ParseError),
	}

	/// Loader that fetches documents over HTTP(S), requesting
	/// `application/ld+json`.
	pub struct ReqwestLoader {
		client: ClientWithMiddleware,
	}

	impl Default for ReqwestLoader {
		fn default() -> Self {
			Self {
				client: reqwest_middleware::ClientBuilder::new(reqwest::Client::default()).build(),
			}
		}
	}

	impl ReqwestLoader {
		pub fn new() -> Self {
			Self::default()
		}

		pub fn with_client(client: ClientWithMiddleware) -> Self {
			Self { client }
		}
	}

	impl Loader for ReqwestLoader {
		async fn load(&self, url: &Iri) -> LoadingResult {
			let wrap = |e: Error| LoadError::new(url.to_owned(), e);
			let response = self
				.client
				.get(url.as_str())
				.header(ACCEPT, "application/ld+json, application/json")
				.send()
				.await
				.map_err(|e| wrap(Error::Reqwest(e)))?;
			if !response.status().is_success() {
				return Err(wrap(Error::QueryFailed(response.status())));
			}
			let content_type = response
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|v| v.to_str().ok())
				.and_then(|v| v.parse().ok());
			let final_url = Iri::new(response.url().as_str())
				.map(|i| i.to_owned())
				.unwrap_or_else(|_| url.to_owned());
			let body = response.text().await.map_err(|e| {
				wrap(Error::Reqwest(reqwest_middleware::Error::Reqwest(e)))
			})?;
			let value = json::parse_str(&body).map_err(|e| wrap(Error::Parse(e)))?;
			let mut doc = RemoteDocument::new(Some(final_url), content_type, value);
			if doc.content_type.is_none() {
				return Err(wrap(Error::InvalidContentType));
			}
			doc.content_type = doc.content_type.take();
			Ok(doc)
		}
	}
}

#[cfg(feature = "reqwest")]
pub use reqwest_loader::ReqwestLoader;
