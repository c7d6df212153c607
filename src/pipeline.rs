use tracing::{info, warn};

use crate::catalog::CatalogClient;
use crate::domain::Descriptor;
use crate::error::ManifestError;
use crate::fetch::AssetClient;
use crate::inspect;
use crate::normalize;
use crate::store::{MANIFEST_KEY, ManifestStore};

/// Counts reported after a completed run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub datasets: usize,
    pub available: usize,
}

/// The reconciliation-and-enrichment pipeline, generic over its three
/// external seams so tests can run it entirely in memory.
pub struct App<C: CatalogClient, A: AssetClient, S: ManifestStore> {
    catalog: C,
    fetcher: A,
    store: S,
}

impl<C: CatalogClient, A: AssetClient, S: ManifestStore> App<C, A, S> {
    pub fn new(catalog: C, fetcher: A, store: S) -> Self {
        Self {
            catalog,
            fetcher,
            store,
        }
    }

    /// One full run: fetch the catalog (fatal on failure), normalize both
    /// record shapes, enrich every descriptor sequentially, publish the
    /// manifest. A failed asset never fails the run; the manifest itself is
    /// the error report.
    pub fn run(&self) -> Result<RunSummary, ManifestError> {
        info!("fetching catalog");
        let catalog = self.catalog.fetch_catalog()?;
        info!(entries = catalog.len(), "catalog fetched");

        let mut descriptors = normalize::collection_descriptors(&catalog)?;
        descriptors.extend(normalize::product_descriptors(&catalog)?);
        info!(datasets = descriptors.len(), "catalog normalized");

        for descriptor in &mut descriptors {
            self.enrich(descriptor);
        }

        let manifest = serde_json::to_string_pretty(&descriptors)
            .map_err(|err| ManifestError::Serialize(err.to_string()))?;
        self.store.put(MANIFEST_KEY, manifest.as_bytes())?;

        let available = descriptors.iter().filter(|d| d.available).count();
        Ok(RunSummary {
            datasets: descriptors.len(),
            available,
        })
    }

    fn enrich(&self, descriptor: &mut Descriptor) {
        info!(name = %descriptor.name, link = %descriptor.link, "downloading asset");
        match self.fetcher.download(&descriptor.link) {
            Ok(bytes) => {
                descriptor.available = true;
                descriptor.size_bytes = Some(bytes.len() as u64);
                descriptor.content_hash = Some(inspect::content_hash(&bytes));
                inspect::enrich(descriptor, &bytes);
            }
            Err(err) => {
                warn!(name = %descriptor.name, error = %err, "asset unavailable");
                descriptor.available = false;
                descriptor.is_oversized_archive = false;
            }
        }
    }
}
