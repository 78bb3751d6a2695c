use thiserror::Error;

/// Load-time failures. Every variant is fatal: the service must not start
/// serving from a partially built catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("malformed record in {file} line {line}: {reason}")]
    Malformed {
        file: String,
        line: u64,
        reason: String,
    },

    #[error("tagging {tagging_id} references unknown shop {shop_id}")]
    UnknownTaggedShop {
        tagging_id: String,
        shop_id: String,
    },

    #[error("tagging {tagging_id} references unknown tag {tag_id}")]
    UnknownTag { tagging_id: String, tag_id: String },

    #[error("product {product_id} references unknown shop {shop_id}")]
    UnknownProductShop {
        product_id: String,
        shop_id: String,
    },

    #[error("shop {shop_id} at ({lat}, {lng}) is outside the configured grid")]
    ShopOutOfBounds {
        shop_id: String,
        lat: f64,
        lng: f64,
    },
}
