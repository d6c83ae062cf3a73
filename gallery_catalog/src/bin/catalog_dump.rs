use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use gallery_catalog::Catalog;

fn main() -> Result<()> {
    let path: PathBuf = env::args()
        .nth(1)
        .context("usage: catalog_dump <catalog file>")?
        .into();
    let catalog = Catalog::load(&path)?;
    println!(
        "{} records in {}",
        catalog.len(),
        path.display()
    );
    println!("{}", serde_json::to_string_pretty(catalog.records())?);
    Ok(())
}
