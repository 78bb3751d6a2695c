//! Catalog construction: shop table + spatial grid, built once at startup.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use shopgrid_core::GridConfig;

use crate::grid::{Grid, ProductEntry};
use crate::records::{
    read_products, read_shops, read_taggings, read_tags, ProductRecord, ShopRecord, TagRecord,
    TaggingRecord,
};
use crate::CatalogError;

#[derive(Debug, Clone)]
pub struct Shop {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Tag names in tagging load order.
    pub tags: Vec<String>,
}

/// The immutable in-memory catalog: shop table plus the spatial grid.
/// Built once, synchronously, before any query is served; shared read-only
/// (behind an `Arc`) for the process lifetime.
#[derive(Debug)]
pub struct Catalog {
    shops: HashMap<String, Shop>,
    grid: Grid,
}

impl Catalog {
    /// Build the catalog from already-parsed records.
    ///
    /// Step order matters: shops first, then tags resolved onto shops, then
    /// products placed into the grid, then a single per-cell sort.
    ///
    /// # Errors
    ///
    /// Fails on any referential inconsistency — a tagging or product naming
    /// an unknown shop or tag, or a shop located outside the grid. A shop
    /// the grid cannot place would make its products silently unreachable,
    /// so the load refuses it outright.
    pub fn build(
        grid_config: GridConfig,
        shop_records: Vec<ShopRecord>,
        tag_records: Vec<TagRecord>,
        tagging_records: Vec<TaggingRecord>,
        product_records: Vec<ProductRecord>,
    ) -> Result<Self, CatalogError> {
        let mut shops: HashMap<String, Shop> = HashMap::with_capacity(shop_records.len());
        for record in shop_records {
            shops.insert(
                record.id.clone(),
                Shop {
                    id: record.id,
                    name: record.name,
                    lat: record.lat,
                    lng: record.lng,
                    tags: Vec::new(),
                },
            );
        }

        let tag_names: HashMap<String, String> = tag_records
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();
        for tagging in tagging_records {
            let tag_name =
                tag_names
                    .get(&tagging.tag_id)
                    .ok_or_else(|| CatalogError::UnknownTag {
                        tagging_id: tagging.id.clone(),
                        tag_id: tagging.tag_id.clone(),
                    })?;
            let shop = shops
                .get_mut(&tagging.shop_id)
                .ok_or_else(|| CatalogError::UnknownTaggedShop {
                    tagging_id: tagging.id.clone(),
                    shop_id: tagging.shop_id.clone(),
                })?;
            shop.tags.push(tag_name.clone());
        }

        let mut grid = Grid::new(grid_config);
        let product_count = product_records.len();
        for record in product_records {
            let shop =
                shops
                    .get(&record.shop_id)
                    .ok_or_else(|| CatalogError::UnknownProductShop {
                        product_id: record.id.clone(),
                        shop_id: record.shop_id.clone(),
                    })?;
            let (x, y) = grid.config().cell_for(shop.lat, shop.lng).ok_or(
                CatalogError::ShopOutOfBounds {
                    shop_id: shop.id.clone(),
                    lat: shop.lat,
                    lng: shop.lng,
                },
            )?;
            let entry = ProductEntry {
                product_id: record.id,
                shop_id: record.shop_id,
                title: record.title,
                popularity: record.popularity,
                quantity: record.quantity,
            };
            grid.insert_around(x, y, &entry);
        }
        grid.sort_cells();

        tracing::info!(
            shops = shops.len(),
            products = product_count,
            grid_entries = grid.entry_count(),
            occupied_cells = grid.occupied_cells(),
            "catalog built"
        );

        Ok(Self { shops, grid })
    }

    /// Load the four record files from `dir` and build the catalog.
    ///
    /// Expects `shops.csv`, `tags.csv`, `taggings.csv` and `products.csv`.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, malformed records, or any [`Catalog::build`]
    /// failure.
    pub fn load_from_dir(dir: &Path, grid_config: GridConfig) -> Result<Self, CatalogError> {
        let open = |name: &str| -> Result<File, CatalogError> {
            let path = dir.join(name);
            File::open(&path).map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })
        };

        let shops = read_shops("shops.csv", open("shops.csv")?)?;
        let tags = read_tags("tags.csv", open("tags.csv")?)?;
        let taggings = read_taggings("taggings.csv", open("taggings.csv")?)?;
        let products = read_products("products.csv", open("products.csv")?)?;

        Self::build(grid_config, shops, tags, taggings, products)
    }

    #[must_use]
    pub fn shop(&self, id: &str) -> Option<&Shop> {
        self.shops.get(id)
    }

    #[must_use]
    pub fn shop_count(&self) -> usize {
        self.shops.len()
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
