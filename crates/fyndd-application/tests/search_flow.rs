use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Notify;

use fyndd_application::{Loaded, ProductUseCase, SearchUseCase, ViewOutcome};
use fyndd_core::Result;
use fyndd_core::camera::{CameraDevice, MediaStream};
use fyndd_core::product::{
    NormalizedProduct, ProductCatalog, ProductId, normalize_product_detail, normalize_product_list,
};
use fyndd_core::search::{MAX_IMAGE_BYTES, ProductSearchService, SearchQuery};

/// Serves canned backend bodies; the query "slow" waits until released.
struct ScriptedSearch {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl ProductSearchService for ScriptedSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<NormalizedProduct>> {
        let body = match query {
            SearchQuery::Text(text) if text == "slow" => {
                self.started.notify_one();
                self.release.notified().await;
                json!({"products": [{"productId": "1", "name": "Old Result"}]})
            }
            SearchQuery::Text(_) => {
                json!({"products": [{"productId": "7", "name": "Red Dress", "price": 1200}]})
            }
            SearchQuery::Image(_) => json!([{"id": "img-1", "title": "Lookalike"}]),
        };
        Ok(normalize_product_list(&body))
    }
}

fn search_usecase() -> (Arc<SearchUseCase>, Arc<ScriptedSearch>) {
    let service = Arc::new(ScriptedSearch {
        started: Notify::new(),
        release: Notify::new(),
    });
    (
        Arc::new(SearchUseCase::new(service.clone(), MAX_IMAGE_BYTES, 0.8)),
        service,
    )
}

#[tokio::test]
async fn test_red_dress_search() {
    let (search, _) = search_usecase();

    let products = search
        .search(SearchQuery::text("  red dress "))
        .await
        .unwrap()
        .applied()
        .unwrap();

    assert_eq!(products.len(), 1);
    let dress = &products[0];
    assert_eq!(dress.id, Some(ProductId::from("7")));
    assert_eq!(dress.title, "Red Dress");
    assert_eq!(dress.price, 1200.0);
    assert!(dress.in_stock);
}

#[tokio::test]
async fn test_superseded_search_is_dropped() {
    let (search, service) = search_usecase();

    let slow = {
        let search = search.clone();
        tokio::spawn(async move { search.search(SearchQuery::text("slow")).await })
    };
    service.started.notified().await;

    let fresh = search.search(SearchQuery::text("red dress")).await.unwrap();
    assert!(!fresh.is_stale());

    service.release.notify_one();
    let stale = slow.await.unwrap().unwrap();
    assert!(stale.is_stale());

    let held = search.results().await.unwrap();
    assert_eq!(held[0].title, "Red Dress");
}

struct StillFrame;

impl MediaStream for StillFrame {
    fn capture_jpeg(&mut self, _quality: f32) -> Result<Vec<u8>> {
        Ok(vec![0xFF, 0xD8, 0xFF])
    }

    fn stop_all_tracks(&mut self) {}
}

struct FakeCamera;

#[async_trait]
impl CameraDevice for FakeCamera {
    async fn open_stream(&self) -> Result<Box<dyn MediaStream>> {
        Ok(Box::new(StillFrame))
    }
}

#[tokio::test]
async fn test_camera_capture_runs_image_search() {
    let (search, _) = search_usecase();
    let session = search.open_camera(&FakeCamera).await.unwrap();

    let loaded = search.capture_and_search(session).await.unwrap();

    assert_eq!(loaded, Loaded::Applied(vec![NormalizedProduct {
        id: Some(ProductId::from("img-1")),
        title: "Lookalike".to_string(),
        ..Default::default()
    }]));
}

struct DetailCatalog;

#[async_trait]
impl ProductCatalog for DetailCatalog {
    async fn products_by_type(&self, _product_type: &str) -> Result<Vec<NormalizedProduct>> {
        Ok(normalize_product_list(&json!({"data": [{"_id": "d1", "productName": "Midi"}]})))
    }

    async fn product_detail(&self, _id: &ProductId) -> Result<NormalizedProduct> {
        Ok(normalize_product_detail(&json!({"product": {"_id": "d1", "productName": "Midi", "mrp": 2000, "salePrice": 1500}})))
    }
}

#[tokio::test]
async fn test_detail_view_ready() {
    let products = ProductUseCase::new(Arc::new(DetailCatalog));

    assert_eq!(products.products_by_type("dresses").await.unwrap()[0].title, "Midi");

    match products.load_detail(&ProductId::from("d1")).await {
        Loaded::Applied(ViewOutcome::Ready(product)) => {
            assert_eq!(product.original_price, 2000.0);
            assert_eq!(product.discount, 25.0);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}
