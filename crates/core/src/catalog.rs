use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Rendered in place of any absent product field, so replies never silently
/// drop a line the user asked about.
pub const FIELD_PLACEHOLDER: &str = "not available";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    pub serial_number: String,
    pub name: String,
    pub category: Option<String>,
    pub mrp: Option<Decimal>,
    pub minimum_price: Option<Decimal>,
    pub units_available: Option<u32>,
    pub description: Option<String>,
    pub specifications: Option<String>,
    pub shipping_details: Option<String>,
    pub policy: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

impl ProductRecord {
    pub fn category_text(&self) -> &str {
        text_or_placeholder(&self.category)
    }

    pub fn mrp_text(&self) -> String {
        decimal_or_placeholder(&self.mrp)
    }

    pub fn minimum_price_text(&self) -> String {
        decimal_or_placeholder(&self.minimum_price)
    }

    pub fn units_text(&self) -> String {
        match self.units_available {
            Some(units) => units.to_string(),
            None => FIELD_PLACEHOLDER.to_string(),
        }
    }

    pub fn description_text(&self) -> &str {
        text_or_placeholder(&self.description)
    }

    pub fn specifications_text(&self) -> &str {
        text_or_placeholder(&self.specifications)
    }

    pub fn shipping_text(&self) -> &str {
        text_or_placeholder(&self.shipping_details)
    }

    pub fn policy_text(&self) -> &str {
        text_or_placeholder(&self.policy)
    }

    pub fn image_text(&self) -> &str {
        text_or_placeholder(&self.image_url)
    }
}

fn text_or_placeholder(field: &Option<String>) -> &str {
    field.as_deref().filter(|value| !value.trim().is_empty()).unwrap_or(FIELD_PLACEHOLDER)
}

fn decimal_or_placeholder(field: &Option<Decimal>) -> String {
    match field {
        Some(value) => value.to_string(),
        None => FIELD_PLACEHOLDER.to_string(),
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not open catalog file `{path}`: {source}")]
    Open { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    Parse { path: PathBuf, source: csv::Error },
}

/// Read-only product table, loaded once at startup and shared for the process
/// lifetime. An unreadable source degrades to an empty catalog, never a
/// startup failure.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.serial_number.clone()) {
                unique.push(record);
            } else {
                warn!(
                    event_name = "catalog.load.duplicate_serial",
                    serial_number = %record.serial_number,
                    "duplicate serial number in catalog source, keeping first occurrence"
                );
            }
        }
        Self { records: unique }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the catalog from a CSV source. Missing or malformed sources are
    /// logged and degrade to an empty catalog so every query resolves to "no
    /// matches" rather than an error.
    pub fn load(path: &Path) -> Self {
        match try_load(path) {
            Ok(records) => {
                let catalog = Self::new(records);
                info!(
                    event_name = "catalog.load.ok",
                    path = %path.display(),
                    product_count = catalog.len(),
                    "catalog loaded"
                );
                catalog
            }
            Err(error) => {
                warn!(
                    event_name = "catalog.load.degraded",
                    path = %path.display(),
                    error = %error,
                    "catalog unavailable, continuing with an empty catalog"
                );
                Self::empty()
            }
        }
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn try_load(path: &Path) -> Result<Vec<ProductRecord>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| match source.kind() {
            csv::ErrorKind::Io(_) => {
                let io = match source.into_kind() {
                    csv::ErrorKind::Io(io) => io,
                    _ => std::io::Error::other("catalog open failed"),
                };
                CatalogError::Open { path: path.to_path_buf(), source: io }
            }
            _ => CatalogError::Parse { path: path.to_path_buf(), source },
        })?;

    let headers = reader
        .headers()
        .map_err(|source| CatalogError::Parse { path: path.to_path_buf(), source })?
        .clone();
    let columns: Vec<Option<Column>> = headers.iter().map(canonical_column).collect();

    let mut records = Vec::new();
    for (row_index, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(error) => {
                warn!(
                    event_name = "catalog.load.bad_row",
                    row = row_index + 1,
                    error = %error,
                    "skipping unreadable catalog row"
                );
                continue;
            }
        };

        match parse_record(&columns, &row, row_index) {
            Some(record) => records.push(record),
            None => warn!(
                event_name = "catalog.load.unnamed_row",
                row = row_index + 1,
                "skipping catalog row without a product name"
            ),
        }
    }

    Ok(records)
}

/// Canonical column identities for the fixed catalog schema. Source exports
/// carry inconsistent header spellings (including `Catogory` and
/// `Discription`), which are normalized here rather than preserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    SerialNumber,
    Name,
    Category,
    Mrp,
    MinimumPrice,
    UnitsAvailable,
    Description,
    Specifications,
    Shipping,
    Policy,
    Image,
    Video,
}

fn canonical_column(header: &str) -> Option<Column> {
    let key: String =
        header.chars().filter(char::is_ascii_alphanumeric).collect::<String>().to_ascii_lowercase();

    match key.as_str() {
        "serialnumber" | "serialno" | "sno" | "srno" => Some(Column::SerialNumber),
        "productname" | "name" => Some(Column::Name),
        "category" | "catogory" => Some(Column::Category),
        "mrp" | "maximumretailprice" => Some(Column::Mrp),
        "minimumretailprice" | "minimumprice" | "minprice" => Some(Column::MinimumPrice),
        "unitsavailable" | "units" | "stock" => Some(Column::UnitsAvailable),
        "productdescriptionsummary" | "productdiscriptionsummary" | "description"
        | "discription" | "productdescription" => Some(Column::Description),
        "productspecifications" | "specifications" | "specs" => Some(Column::Specifications),
        "shippingdetails" | "shipping" => Some(Column::Shipping),
        "policy" | "policies" | "returnpolicy" => Some(Column::Policy),
        "productimage" | "image" | "imageurl" => Some(Column::Image),
        "productvideo" | "video" | "videourl" => Some(Column::Video),
        _ => None,
    }
}

fn parse_record(
    columns: &[Option<Column>],
    row: &csv::StringRecord,
    row_index: usize,
) -> Option<ProductRecord> {
    let mut record = ProductRecord {
        serial_number: String::new(),
        name: String::new(),
        category: None,
        mrp: None,
        minimum_price: None,
        units_available: None,
        description: None,
        specifications: None,
        shipping_details: None,
        policy: None,
        image_url: None,
        video_url: None,
    };

    for (column, value) in columns.iter().zip(row.iter()) {
        let Some(column) = column else { continue };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match column {
            Column::SerialNumber => record.serial_number = value.to_string(),
            Column::Name => record.name = value.to_string(),
            Column::Category => record.category = Some(value.to_string()),
            Column::Mrp => record.mrp = parse_price(value),
            Column::MinimumPrice => record.minimum_price = parse_price(value),
            Column::UnitsAvailable => record.units_available = value.parse().ok(),
            Column::Description => record.description = Some(value.to_string()),
            Column::Specifications => record.specifications = Some(value.to_string()),
            Column::Shipping => record.shipping_details = Some(value.to_string()),
            Column::Policy => record.policy = Some(value.to_string()),
            Column::Image => record.image_url = Some(value.to_string()),
            Column::Video => record.video_url = Some(value.to_string()),
        }
    }

    if record.name.is_empty() {
        return None;
    }
    if record.serial_number.is_empty() {
        record.serial_number = format!("row-{}", row_index + 1);
    }

    Some(record)
}

fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned: String =
        raw.chars().filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-').collect();
    Decimal::from_str(&cleaned).ok()
}
