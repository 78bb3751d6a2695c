//! Raw catalog records and their CSV readers.
//!
//! The source files are tabular with a header row; fields are taken by
//! position, not by header name. Any missing field or unparsable number is
//! fatal to the load.

use std::io::Read;

use crate::CatalogError;

#[derive(Debug, Clone)]
pub struct ShopRecord {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone)]
pub struct TagRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct TaggingRecord {
    pub id: String,
    pub shop_id: String,
    pub tag_id: String,
}

#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub id: String,
    pub shop_id: String,
    pub title: String,
    pub popularity: f64,
    pub quantity: u32,
}

fn record_line(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

fn field<'r>(
    file: &str,
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<&'r str, CatalogError> {
    record.get(idx).ok_or_else(|| CatalogError::Malformed {
        file: file.to_string(),
        line: record_line(record),
        reason: format!("missing field {name} (column {idx})"),
    })
}

fn f64_field(
    file: &str,
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<f64, CatalogError> {
    let raw = field(file, record, idx, name)?;
    let value: f64 = raw.parse().map_err(|_| CatalogError::Malformed {
        file: file.to_string(),
        line: record_line(record),
        reason: format!("{name} is not a number: {raw:?}"),
    })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CatalogError::Malformed {
            file: file.to_string(),
            line: record_line(record),
            reason: format!("{name} must be finite: {raw:?}"),
        })
    }
}

fn u32_field(
    file: &str,
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<u32, CatalogError> {
    let raw = field(file, record, idx, name)?;
    raw.parse().map_err(|_| CatalogError::Malformed {
        file: file.to_string(),
        line: record_line(record),
        reason: format!("{name} is not a non-negative integer: {raw:?}"),
    })
}

fn records_from<R: Read>(reader: R) -> csv::StringRecordsIntoIter<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
        .into_records()
}

fn csv_error(file: &str, source: csv::Error) -> CatalogError {
    CatalogError::Csv {
        file: file.to_string(),
        source,
    }
}

/// Read shop records: `(shop_id, name, lat, lng)`.
///
/// # Errors
///
/// Returns `CatalogError` on CSV-level failures or malformed fields.
pub fn read_shops<R: Read>(file: &str, reader: R) -> Result<Vec<ShopRecord>, CatalogError> {
    let mut shops = Vec::new();
    for record in records_from(reader) {
        let record = record.map_err(|e| csv_error(file, e))?;
        shops.push(ShopRecord {
            id: field(file, &record, 0, "shop_id")?.to_string(),
            name: field(file, &record, 1, "name")?.to_string(),
            lat: f64_field(file, &record, 2, "lat")?,
            lng: f64_field(file, &record, 3, "lng")?,
        });
    }
    Ok(shops)
}

/// Read tag records: `(tag_id, tag_name)`.
///
/// # Errors
///
/// Returns `CatalogError` on CSV-level failures or malformed fields.
pub fn read_tags<R: Read>(file: &str, reader: R) -> Result<Vec<TagRecord>, CatalogError> {
    let mut tags = Vec::new();
    for record in records_from(reader) {
        let record = record.map_err(|e| csv_error(file, e))?;
        tags.push(TagRecord {
            id: field(file, &record, 0, "tag_id")?.to_string(),
            name: field(file, &record, 1, "tag_name")?.to_string(),
        });
    }
    Ok(tags)
}

/// Read tagging records: `(tagging_id, shop_id, tag_id)`.
///
/// # Errors
///
/// Returns `CatalogError` on CSV-level failures or malformed fields.
pub fn read_taggings<R: Read>(file: &str, reader: R) -> Result<Vec<TaggingRecord>, CatalogError> {
    let mut taggings = Vec::new();
    for record in records_from(reader) {
        let record = record.map_err(|e| csv_error(file, e))?;
        taggings.push(TaggingRecord {
            id: field(file, &record, 0, "tagging_id")?.to_string(),
            shop_id: field(file, &record, 1, "shop_id")?.to_string(),
            tag_id: field(file, &record, 2, "tag_id")?.to_string(),
        });
    }
    Ok(taggings)
}

/// Read product records: `(product_id, shop_id, title, popularity, quantity)`.
///
/// Popularity arrives as text in the source files; it is normalized to `f64`
/// here so ranking compares numbers, not strings.
///
/// # Errors
///
/// Returns `CatalogError` on CSV-level failures or malformed fields.
pub fn read_products<R: Read>(file: &str, reader: R) -> Result<Vec<ProductRecord>, CatalogError> {
    let mut products = Vec::new();
    for record in records_from(reader) {
        let record = record.map_err(|e| csv_error(file, e))?;
        products.push(ProductRecord {
            id: field(file, &record, 0, "product_id")?.to_string(),
            shop_id: field(file, &record, 1, "shop_id")?.to_string(),
            title: field(file, &record, 2, "title")?.to_string(),
            popularity: f64_field(file, &record, 3, "popularity")?,
            quantity: u32_field(file, &record, 4, "quantity")?,
        });
    }
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_shops_skips_header_and_parses_by_position() {
        let csv = "id,name,lat,lng\ns1,Coffee Corner,59.170,17.870\ns2,Bakery,59.172,17.872\n";
        let shops = read_shops("shops.csv", csv.as_bytes()).unwrap();
        assert_eq!(shops.len(), 2);
        assert_eq!(shops[0].id, "s1");
        assert_eq!(shops[0].name, "Coffee Corner");
        assert!((shops[0].lat - 59.170).abs() < 1e-9);
        assert!((shops[1].lng - 17.872).abs() < 1e-9);
    }

    #[test]
    fn read_shops_rejects_non_numeric_latitude() {
        let csv = "id,name,lat,lng\ns1,Coffee Corner,north,17.870\n";
        let err = read_shops("shops.csv", csv.as_bytes()).unwrap_err();
        assert!(
            matches!(err, CatalogError::Malformed { ref file, line, .. } if file == "shops.csv" && line == 2),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn read_shops_rejects_missing_field() {
        let csv = "id,name,lat,lng\ns1,Coffee Corner\n";
        let err = read_shops("shops.csv", csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }), "got: {err}");
    }

    #[test]
    fn read_products_normalizes_popularity_to_f64() {
        let csv = "id,shop_id,title,popularity,quantity\n\
                   p1,s1,Apple,0.815,10\n\
                   p2,s1,Pear,0.09,3\n";
        let products = read_products("products.csv", csv.as_bytes()).unwrap();
        assert_eq!(products.len(), 2);
        assert!((products[0].popularity - 0.815).abs() < 1e-9);
        assert_eq!(products[1].quantity, 3);
    }

    #[test]
    fn read_products_rejects_negative_quantity() {
        let csv = "id,shop_id,title,popularity,quantity\np1,s1,Apple,0.8,-2\n";
        let err = read_products("products.csv", csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }), "got: {err}");
    }

    #[test]
    fn read_products_rejects_non_finite_popularity() {
        let csv = "id,shop_id,title,popularity,quantity\np1,s1,Apple,NaN,2\n";
        let err = read_products("products.csv", csv.as_bytes()).unwrap_err();
        assert!(
            matches!(err, CatalogError::Malformed { ref reason, .. } if reason.contains("finite")),
            "got: {err}"
        );
    }

    #[test]
    fn read_taggings_keeps_reference_ids_as_text() {
        let csv = "id,shop_id,tag_id\nt1,s1,g7\n";
        let taggings = read_taggings("taggings.csv", csv.as_bytes()).unwrap();
        assert_eq!(taggings[0].shop_id, "s1");
        assert_eq!(taggings[0].tag_id, "g7");
    }

    #[test]
    fn quoted_titles_with_commas_survive() {
        let csv = "id,shop_id,title,popularity,quantity\np1,s1,\"Tea, loose leaf\",0.5,1\n";
        let products = read_products("products.csv", csv.as_bytes()).unwrap();
        assert_eq!(products[0].title, "Tea, loose leaf");
    }
}
