//! Cart domain models.
//!
//! Carts are owned by the backend; this layer only reads them. Quantities and
//! prices always come from the latest fetch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::friend::UserSummary;
use crate::product::normalize::{IMAGE_URL, PRICE, PRODUCT_ID, TITLE};
use crate::product::{FieldResolver, ProductId};

const QUANTITY: FieldResolver = FieldResolver::new(&["quantity", "qty"]);
const PRODUCT_REF: FieldResolver = FieldResolver::new(&["productId", "product_id"]);

/// One line of a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartItem {
    /// Builds an item from a cart entry payload.
    ///
    /// The product id is looked up on the entry itself and then on a nested
    /// `product` object (populated carts). Entries without an id are skipped
    /// by the caller since they cannot be removed or updated.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let entry = payload.as_object()?;
        let empty = Map::new();
        let product = match entry.get("product") {
            Some(Value::Object(product)) => product,
            _ => &empty,
        };
        let lookup_string = |resolver: FieldResolver| {
            resolver
                .string(entry)
                .or_else(|| resolver.string(product))
        };

        // An entry's own `_id` is usually the cart line, not the product.
        let product_id = PRODUCT_REF
            .string(entry)
            .or_else(|| PRODUCT_ID.string(product))
            .or_else(|| entry.get("product").and_then(Value::as_str).map(str::to_string))
            .or_else(|| PRODUCT_ID.string(entry))?;

        Some(Self {
            product_id: ProductId::from(product_id),
            title: lookup_string(TITLE).unwrap_or_default(),
            image_url: lookup_string(IMAGE_URL).unwrap_or_default(),
            price: PRICE
                .number(entry)
                .or_else(|| PRICE.number(product))
                .unwrap_or(0.0),
            quantity: QUANTITY
                .count(entry)
                .map(|q| q.min(u32::MAX as u64) as u32)
                .unwrap_or(1),
        })
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A freshly fetched cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Picks the item sequence out of a cart response.
    ///
    /// Tries `items`, `cart.items`, `data.items`, `data`, then a bare array.
    /// Anything else is an empty cart.
    pub fn from_response(response: &Value) -> Self {
        let items = [
            response.get("items"),
            response.get("cart").and_then(|c| c.get("items")),
            response.get("data").and_then(|d| d.get("items")),
            response.get("data"),
            Some(response),
        ]
        .into_iter()
        .flatten()
        .find_map(Value::as_array)
        .map(|list| list.iter().filter_map(CartItem::from_payload).collect())
        .unwrap_or_default();
        Self { items }
    }

    /// Display subtotal recomputed from the current item list.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A friend's cart as returned by `GET /cart/friends`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendCart {
    pub friend: UserSummary,
    pub cart: Cart,
}

impl FriendCart {
    /// Parses the friends' carts response (`carts`, `friendsCarts`, `data`,
    /// or a bare array). Entries without a resolvable friend are skipped.
    pub fn list_from_response(response: &Value) -> Vec<FriendCart> {
        let list = ["carts", "friendsCarts", "data"]
            .iter()
            .find_map(|key| response.get(*key).and_then(Value::as_array))
            .or_else(|| response.as_array());

        list.map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let friend_payload = ["friend", "user", "owner"]
                        .iter()
                        .find_map(|key| entry.get(*key))?;
                    Some(FriendCart {
                        friend: UserSummary::from_payload(friend_payload)?,
                        cart: Cart::from_response(entry),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
    }
}
