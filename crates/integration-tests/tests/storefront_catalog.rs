//! Integration tests for the storefront catalog endpoints.
//!
//! The fixture feed holds six items: one songket, one ulos, two ikat cloths
//! sharing a title, one endek, and one untitled item.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::Value;
use tenun_integration_tests::{get, test_app, test_config};
use tenun_storefront::config::CatalogSource;
use tenun_storefront::state::AppState;

fn slugs(listing: &Value) -> Vec<String> {
    listing["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app();

    let live = get(&app, "/health", None).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.text(), "ok");

    let ready = get(&app, "/health/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_fails_without_feed() {
    let config = test_config(CatalogSource::File(
        std::env::temp_dir().join("tenun-missing-feed.xml"),
    ));
    let app = tenun_storefront::app(AppState::new(config));

    let ready = get(&app, "/health/ready", None).await;
    assert_eq!(ready.status, StatusCode::SERVICE_UNAVAILABLE);

    let listing = get(&app, "/products", None).await;
    assert_eq!(listing.status, StatusCode::BAD_GATEWAY);
    assert!(listing.json()["error"].is_string());
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = test_app();

    let response = get(&app, "/health", None).await;
    let generated = response.request_id.unwrap();
    assert_eq!(generated.len(), 36);
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_listing_defaults_to_newest_first() {
    let app = test_app();

    let response = get(&app, "/products", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let listing = response.json();
    assert_eq!(listing["total"], 6);
    assert_eq!(listing["activeFilters"], 0);
    assert_eq!(listing["query"], "");

    // Dated items newest first, undated ones after in feed order.
    assert_eq!(
        slugs(&listing),
        vec![
            "songket-pandai-sikek-merah",
            "ulos-ragidup-batak",
            "kain-ikat-sumba",
            "endek-bali-motif-cepuk",
            "kain-ikat-sumba-2",
            "kain-tenun",
        ]
    );
}

#[tokio::test]
async fn test_listing_products_satisfy_invariants() {
    let app = test_app();
    let listing = get(&app, "/products", None).await.json();

    for product in listing["products"].as_array().unwrap() {
        assert!(!product["id"].as_str().unwrap().is_empty());
        assert!(!product["slug"].as_str().unwrap().is_empty());
        assert!(!product["title"].as_str().unwrap().is_empty());
        assert!(product["price"].as_i64().unwrap() > 0);
        let rating = product["rating"].as_f64().unwrap();
        assert!((0.0..=5.0).contains(&rating));
        assert!(product["priceDisplay"].as_str().unwrap().starts_with("Rp "));
    }
}

#[tokio::test]
async fn test_listing_category_filter() {
    let app = test_app();

    let listing = get(&app, "/products?category=ikat", None).await.json();
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["activeFilters"], 1);
    assert_eq!(listing["query"], "category=Ikat");
    assert_eq!(listing["filters"]["categories"][0], "Ikat");

    let listing = get(&app, "/products?category=Ulos,Songket", None)
        .await
        .json();
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["activeFilters"], 2);
}

#[tokio::test]
async fn test_listing_in_stock_and_price_sort() {
    let app = test_app();

    let listing = get(&app, "/products?inStock=true&sort=price-asc", None)
        .await
        .json();

    let products = listing["products"].as_array().unwrap();
    assert_eq!(listing["total"], products.len());
    assert!(products.iter().all(|p| p["inStock"] == true));
    assert!(!slugs(&listing).contains(&"kain-ikat-sumba-2".to_string()));

    let prices: Vec<i64> = products
        .iter()
        .map(|p| p["price"].as_i64().unwrap())
        .collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_listing_price_bounds_are_inclusive() {
    let app = test_app();
    let all = get(&app, "/products?sort=price-asc", None).await.json();
    let cheapest = all["products"][0]["price"].as_i64().unwrap();

    let listing = get(
        &app,
        &format!("/products?minPrice={cheapest}&maxPrice={cheapest}"),
        None,
    )
    .await
    .json();

    assert_eq!(listing["total"], 1);
    assert_eq!(listing["products"][0]["price"], cheapest);
}

#[tokio::test]
async fn test_listing_search_and_canonical_query() {
    let app = test_app();

    let listing = get(&app, "/products?q=%20Sumba%20&sort=bogus", None)
        .await
        .json();

    assert_eq!(listing["total"], 2);
    // Search text is not a counted filter; invalid sort falls back silently.
    assert_eq!(listing["activeFilters"], 0);
    assert_eq!(listing["query"], "q=Sumba");
}

// =============================================================================
// Detail & Categories
// =============================================================================

#[tokio::test]
async fn test_product_detail() {
    let app = test_app();

    let response = get(&app, "/products/songket-pandai-sikek-merah", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let product = response.json();
    assert_eq!(product["title"], "Songket Pandai Sikek Merah");
    assert_eq!(product["category"], "Songket");
    assert_eq!(product["image"], "https://tenun.example/img/songket.jpg");
    assert_eq!(
        product["description"],
        "Songket benang emas dari Pandai Sikek , Sumatra Barat."
    );
    assert_eq!(product["tags"], serde_json::json!(["Sumatra", "songket"]));
}

#[tokio::test]
async fn test_product_detail_fallbacks() {
    let app = test_app();

    let untitled = get(&app, "/products/kain-tenun", None).await.json();
    assert_eq!(untitled["title"], "Kain Tenun");
    assert_eq!(untitled["category"], "Lainnya");
    assert_eq!(untitled["image"], "/images/placeholder.jpg");

    let endek = get(&app, "/products/endek-bali-motif-cepuk", None)
        .await
        .json();
    assert_eq!(endek["description"], "Endek dari Klungkung.");

    let ulos = get(&app, "/products/ulos-ragidup-batak", None).await.json();
    assert_eq!(ulos["image"], "https://tenun.example/img/ulos.jpg");
}

#[tokio::test]
async fn test_product_detail_unknown_slug() {
    let app = test_app();

    let response = get(&app, "/products/kain-tidak-ada", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(
        response.json()["error"]
            .as_str()
            .unwrap()
            .contains("kain-tidak-ada")
    );
}

#[tokio::test]
async fn test_categories_facet() {
    let app = test_app();

    let facets = get(&app, "/categories?category=Ikat", None).await.json();
    let facets = facets.as_array().unwrap();
    assert_eq!(facets.len(), 7);

    let find = |name: &str| {
        facets
            .iter()
            .find(|f| f["category"] == name)
            .unwrap()
            .clone()
    };

    let ikat = find("Ikat");
    assert_eq!(ikat["count"], 2);
    assert_eq!(ikat["selected"], true);
    assert_eq!(ikat["toggleQuery"], "");

    let ulos = find("Ulos");
    assert_eq!(ulos["count"], 1);
    assert_eq!(ulos["selected"], false);
    assert_eq!(ulos["toggleQuery"], "category=Ikat%2CUlos");

    assert_eq!(find("Lurik")["count"], 0);
    assert_eq!(find("Lainnya")["count"], 1);
}
