use anyhow::Result;
use clap::Subcommand;

use fyndd_application::FynddApp;
use fyndd_core::FynddError;
use fyndd_core::product::{NormalizedProduct, ProductId};

use super::Output;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show your cart
    Show,
    /// Add a product to your cart
    Add {
        product_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from your cart
    Remove { product_id: String },
    /// Empty your cart
    Clear,
    /// Show what your friends have in their carts
    Friends,
}

pub async fn run(app: &FynddApp, out: &Output, action: CartAction) -> Result<()> {
    match action {
        CartAction::Show => out.cart(&app.cart.fetch().await?),
        CartAction::Add {
            product_id,
            quantity,
        } => {
            let product = NormalizedProduct {
                id: Some(ProductId::from(product_id.clone())),
                ..Default::default()
            };
            let from_path = format!("/product/{}", product_id);
            match app.cart.add_product(&product, quantity, &from_path).await {
                Ok(cart) => {
                    out.success("Added to cart.");
                    out.cart(&cart)
                }
                Err(FynddError::NotAuthenticated) => {
                    out.notice("Log in with `fyndd auth login` and the item will be added.");
                    Err(FynddError::NotAuthenticated.into())
                }
                Err(e) => Err(e.into()),
            }
        }
        CartAction::Remove { product_id } => {
            let cart = app.cart.remove(&ProductId::from(product_id)).await?;
            out.success("Removed from cart.");
            out.cart(&cart)
        }
        CartAction::Clear => {
            let cart = app.cart.clear().await?;
            out.success("Cart cleared.");
            out.cart(&cart)
        }
        CartAction::Friends => out.friend_carts(&app.cart.friends_carts().await?),
    }
}
