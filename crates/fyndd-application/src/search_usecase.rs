//! Search use case: validates queries, runs them and keeps the results of the
//! latest search only.

use std::sync::Arc;
use tokio::sync::RwLock;

use fyndd_core::camera::{CameraDevice, CameraSession};
use fyndd_core::product::NormalizedProduct;
use fyndd_core::search::{ProductSearchService, SearchQuery};
use fyndd_core::{FynddError, Result};

use crate::view::{Loaded, ViewTracker};

pub struct SearchUseCase {
    service: Arc<dyn ProductSearchService>,
    tracker: ViewTracker,
    results: RwLock<Option<Vec<NormalizedProduct>>>,
    max_image_bytes: usize,
    jpeg_quality: f32,
}

impl SearchUseCase {
    pub fn new(
        service: Arc<dyn ProductSearchService>,
        max_image_bytes: usize,
        jpeg_quality: f32,
    ) -> Self {
        Self {
            service,
            tracker: ViewTracker::new(),
            results: RwLock::new(None),
            max_image_bytes,
            jpeg_quality,
        }
    }

    /// Runs a search. Invalid queries fail before any network call.
    ///
    /// If another search starts (or the view is left) while this one is in
    /// flight, its outcome is discarded and `Loaded::Stale` is returned.
    pub async fn search(&self, query: SearchQuery) -> Result<Loaded<Vec<NormalizedProduct>>> {
        let query = query.prepared(self.max_image_bytes)?;
        let ticket = self.tracker.begin();
        let outcome = self.service.search(&query).await;

        // Checked under the lock; `leave` invalidates before taking it.
        let mut results = self.results.write().await;
        if !self.tracker.is_current(ticket) {
            tracing::debug!("[Search] Dropping superseded {} search", query.mode().as_str());
            return Ok(Loaded::Stale);
        }

        let products = outcome.map_err(FynddError::into_search_failure)?;
        *results = Some(products.clone());
        Ok(Loaded::Applied(products))
    }

    /// Opens the camera for an image search.
    pub async fn open_camera(&self, device: &dyn CameraDevice) -> Result<CameraSession> {
        Ok(CameraSession::open(device)
            .await?
            .with_quality(self.jpeg_quality))
    }

    /// Captures the current frame, releasing the camera, and searches with it.
    pub async fn capture_and_search(
        &self,
        session: CameraSession,
    ) -> Result<Loaded<Vec<NormalizedProduct>>> {
        let blob = session.capture()?;
        self.search(SearchQuery::Image(blob)).await
    }

    /// Results of the last applied search, if still held.
    pub async fn results(&self) -> Option<Vec<NormalizedProduct>> {
        self.results.read().await.clone()
    }

    /// Leaves the results view: in-flight searches become stale and held
    /// results are dropped.
    pub async fn leave(&self) {
        self.tracker.invalidate();
        *self.results.write().await = None;
    }
}
