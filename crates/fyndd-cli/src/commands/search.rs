use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use fyndd_application::{FynddApp, Loaded};
use fyndd_core::search::SearchQuery;
use fyndd_infrastructure::image_file::load_image;

use super::Output;

#[derive(Subcommand)]
pub enum SearchAction {
    /// Search with free text, e.g. `fyndd search text red dress`
    Text {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Search with an image file
    Image { path: PathBuf },
}

pub async fn run(app: &FynddApp, out: &Output, action: SearchAction) -> Result<()> {
    let query = match action {
        SearchAction::Text { query } => SearchQuery::text(query.join(" ")),
        SearchAction::Image { path } => {
            SearchQuery::Image(load_image(&path, app.config.max_image_bytes).await?)
        }
    };

    match app.search.search(query).await? {
        Loaded::Applied(products) => out.products(&products),
        Loaded::Stale => Ok(()),
    }
}
