use anyhow::{Result, bail};
use clap::Subcommand;

use fyndd_application::{FynddApp, Loaded, RecoveryAction, ViewOutcome};
use fyndd_core::product::ProductId;

use super::Output;

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List products of a type, e.g. `dresses`
    List {
        #[arg(value_name = "TYPE")]
        product_type: String,
    },
    /// Show one product
    Show { id: String },
}

pub async fn run(app: &FynddApp, out: &Output, action: ProductsAction) -> Result<()> {
    match action {
        ProductsAction::List { product_type } => {
            let products = app.products.products_by_type(&product_type).await?;
            out.products(&products)
        }
        ProductsAction::Show { id } => {
            match app.products.load_detail(&ProductId::from(id.clone())).await {
                Loaded::Applied(ViewOutcome::Ready(product)) => out.product(&product),
                Loaded::Applied(ViewOutcome::Failed { message, recovery }) => {
                    let hint = match recovery {
                        RecoveryAction::Retry => format!("run `fyndd products show {}` again", id),
                        RecoveryAction::NavigateBack => "go back to your search".to_string(),
                        RecoveryAction::Login => "run `fyndd auth login`".to_string(),
                    };
                    bail!("{} ({}: {})", message, recovery.label(), hint)
                }
                Loaded::Stale => Ok(()),
            }
        }
    }
}
