//! Component repository locations
//!
//! Fetching component sources is the job of an external collaborator. The
//! model only needs to turn a component declaration into a concrete
//! [`Repository`], which [`RepositoryResolver`] abstracts. The bundled
//! [`BaseUrlResolver`] handles the common shorthand forms without touching
//! the network.

use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};
use crate::params::Parameters;
use crate::record::ComponentRecord;

/// Default server for `org/name` shorthand repositories
pub const DEFAULT_BASE_URL: &str = "https://github.com/";

/// Default reference when a declaration names none
pub const DEFAULT_REFERENCE: &str = "main";

/// Concrete location of a component's sources
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Repository {
    /// URL or local path
    pub location: String,

    /// Branch, tag or commit
    pub reference: String,

    /// Authentication parameters handed to the fetcher
    #[serde(skip_serializing_if = "Parameters::is_empty")]
    pub auth: Parameters,
}

impl Repository {
    pub fn new(location: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            reference: reference.into(),
            auth: Parameters::default(),
        }
    }

    /// Whether no location is known
    pub fn is_empty(&self) -> bool {
        self.location.trim().is_empty()
    }
}

/// Turns a component declaration into a repository location
pub trait RepositoryResolver {
    /// Resolve component `id` declared by `record`.
    ///
    /// `base` is the repository of the descriptor declaring the component,
    /// used to resolve relative locations.
    fn resolve(
        &self,
        id: &str,
        record: &ComponentRecord,
        base: Option<&Repository>,
    ) -> Result<Repository>;
}

/// Resolver for absolute URLs, local paths and `org/name` shorthands
///
/// - absolute URLs are kept as they are;
/// - paths starting with `/` or `.` are kept as they are;
/// - anything else is resolved against the server of `base`, or against the
///   configured base URL when `base` is not a URL.
#[derive(Debug, Clone)]
pub struct BaseUrlResolver {
    base: Url,
}

impl BaseUrlResolver {
    /// Create a resolver whose default server is `base`, usually
    /// [`DEFAULT_BASE_URL`].
    pub fn new(base: &str) -> std::result::Result<Self, url::ParseError> {
        Ok(Self {
            base: Url::parse(base)?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn server_of(&self, base: Option<&Repository>) -> Url {
        let mut server = base
            .and_then(|repo| Url::parse(&repo.location).ok())
            .filter(|url| url.has_host())
            .unwrap_or_else(|| self.base.clone());
        server.set_path("/");
        server.set_query(None);
        server.set_fragment(None);
        server
    }
}

impl RepositoryResolver for BaseUrlResolver {
    fn resolve(
        &self,
        id: &str,
        record: &ComponentRecord,
        base: Option<&Repository>,
    ) -> Result<Repository> {
        let location = record.repository.trim();
        if location.is_empty() {
            return Err(Error::Resolution {
                id: id.to_string(),
                reason: "empty repository".to_string(),
            });
        }

        let resolved = if location.starts_with('/') || location.starts_with('.') {
            location.to_string()
        } else {
            match Url::parse(location) {
                Ok(url) => url.to_string(),
                Err(url::ParseError::RelativeUrlWithoutBase) => self
                    .server_of(base)
                    .join(location)
                    .map_err(|source| Error::InvalidRepositoryUrl {
                        id: id.to_string(),
                        location: location.to_string(),
                        source,
                    })?
                    .to_string(),
                Err(source) => {
                    return Err(Error::InvalidRepositoryUrl {
                        id: id.to_string(),
                        location: location.to_string(),
                        source,
                    });
                }
            }
        };

        let reference = if record.reference.trim().is_empty() {
            DEFAULT_REFERENCE.to_string()
        } else {
            record.reference.trim().to_string()
        };

        tracing::debug!(id, location = %resolved, %reference, "Resolved component repository");

        Ok(Repository {
            location: resolved,
            reference,
            auth: record.auth.clone(),
        })
    }
}
