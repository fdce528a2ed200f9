//! Published-baseline lookup over an ordered chain of package sources.

mod service;

pub use docpreview_backend_api::{
    BackendError, BackendResult, PackageSource, SourceRegistry, SourceSummary,
};
pub use docpreview_backends::{default_registry, PackageCache, RemoteRegistry};

pub use service::{BaselineService, PublishedBaseline};
