//! Normalisation of heterogeneous product payloads.

use serde_json::{Map, Value};

use super::model::{NormalizedProduct, ProductId};
use super::resolver::FieldResolver;

pub const PRODUCT_ID: FieldResolver =
    FieldResolver::new(&["id", "_id", "productId", "product_id"]);
pub const TITLE: FieldResolver =
    FieldResolver::new(&["title", "name", "productName", "product_name"]);
pub const DESCRIPTION: FieldResolver = FieldResolver::new(&["description", "desc", "details"]);
pub const IMAGE_URL: FieldResolver =
    FieldResolver::new(&["imageUrl", "image_url", "image", "thumbnail", "img"]);
pub const IMAGES: FieldResolver = FieldResolver::new(&["images", "imageUrls", "image_urls"]);
pub const PRICE: FieldResolver =
    FieldResolver::new(&["price", "salePrice", "sale_price", "currentPrice"]);
pub const ORIGINAL_PRICE: FieldResolver =
    FieldResolver::new(&["originalPrice", "original_price", "mrp", "listPrice"]);
pub const DISCOUNT: FieldResolver =
    FieldResolver::new(&["discount", "discountPercent", "discount_percentage"]);
pub const BRAND: FieldResolver = FieldResolver::new(&["brand", "brandName", "brand_name"]);
pub const CATEGORY: FieldResolver =
    FieldResolver::new(&["category", "categoryName", "type", "productType"]);
pub const RATING: FieldResolver = FieldResolver::new(&["rating", "averageRating", "avgRating"]);
pub const REVIEW_COUNT: FieldResolver = FieldResolver::new(&[
    "reviewCount",
    "reviewsCount",
    "reviews_count",
    "numReviews",
    "ratingCount",
]);
pub const IN_STOCK: FieldResolver =
    FieldResolver::new(&["inStock", "in_stock", "isAvailable", "available"]);

/// Keys under which a product list may be wrapped, tried in order after
/// `products` and the bare array.
const LIST_ENVELOPES: &[&str] = &["data"];

/// Normalises one product payload.
///
/// Pure and total: any JSON value produces a record. Non-object values yield
/// the defaults with no id.
pub fn normalize_product(payload: &Value) -> NormalizedProduct {
    let empty = Map::new();
    let object = payload.as_object().unwrap_or(&empty);
    normalize_object(object)
}

fn normalize_object(object: &Map<String, Value>) -> NormalizedProduct {
    let images = IMAGES.string_list(object);
    let image_url = IMAGE_URL
        .string(object)
        .or_else(|| images.as_ref().and_then(|list| list.first().cloned()))
        .unwrap_or_default();
    let images = images.unwrap_or_else(|| {
        if image_url.is_empty() {
            Vec::new()
        } else {
            vec![image_url.clone()]
        }
    });

    let price = PRICE.number(object).unwrap_or(0.0);
    let original_price = ORIGINAL_PRICE.number(object).unwrap_or(0.0);
    let discount = DISCOUNT
        .number(object)
        .unwrap_or_else(|| derived_discount(price, original_price));

    NormalizedProduct {
        id: PRODUCT_ID.string(object).map(ProductId::from),
        title: TITLE.string(object).unwrap_or_default(),
        description: DESCRIPTION.string(object).unwrap_or_default(),
        image_url,
        images,
        price,
        original_price,
        discount,
        brand: BRAND.string(object).unwrap_or_default(),
        category: CATEGORY.string(object).unwrap_or_default(),
        rating: RATING.number(object).unwrap_or(0.0),
        review_count: REVIEW_COUNT.count(object).unwrap_or(0),
        in_stock: IN_STOCK.boolean(object).unwrap_or(true),
    }
}

fn derived_discount(price: f64, original_price: f64) -> f64 {
    if original_price > price && price > 0.0 {
        ((original_price - price) / original_price * 100.0).round()
    } else {
        0.0
    }
}

/// Picks the product sequence out of a list response.
///
/// Tries `products`, then a bare array, then `data`; the first array found is
/// authoritative. Anything else is treated as an empty result.
pub fn unwrap_product_list(response: &Value) -> &[Value] {
    if let Some(list) = response.get("products").and_then(Value::as_array) {
        return list;
    }
    if let Some(list) = response.as_array() {
        return list;
    }
    LIST_ENVELOPES
        .iter()
        .find_map(|key| response.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Unwraps and normalises a whole list response.
pub fn normalize_product_list(response: &Value) -> Vec<NormalizedProduct> {
    unwrap_product_list(response)
        .iter()
        .map(normalize_product)
        .collect()
}

/// Picks a single product out of a detail response (`product`, `data`, or the
/// object itself).
pub fn normalize_product_detail(response: &Value) -> NormalizedProduct {
    let inner = ["product", "data"]
        .iter()
        .find_map(|key| response.get(*key).filter(|v| v.is_object()))
        .unwrap_or(response);
    normalize_product(inner)
}
