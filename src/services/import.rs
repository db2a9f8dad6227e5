//! Import service
//!
//! Reads bills or subscriptions from a JSON array or a CSV file, validates
//! each row into a model value, and stores the good ones. Bad rows are
//! reported by row number instead of aborting the whole import.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::error::{BillflowError, BillflowResult};
use crate::models::{Bill, Obligation, Subscription, UserId};
use crate::storage::{BillRecord, RawAmount, Storage, SubscriptionRecord};

use super::bill::BillService;
use super::subscription::SubscriptionService;

/// Input file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Parse format from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::parse)
    }
}

/// Which kind of obligation the rows describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportKind {
    #[default]
    Bill,
    Subscription,
}

impl ImportKind {
    /// Parse kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bill" | "bills" => Some(Self::Bill),
            "sub" | "subs" | "subscription" | "subscriptions" => Some(Self::Subscription),
            _ => None,
        }
    }
}

/// One parsed row: the obligation, or why it was rejected
#[derive(Debug, Clone)]
pub struct ParsedRow {
    /// 1-based data row number (the CSV header is not counted)
    pub row_number: usize,
    pub result: Result<Obligation, String>,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Number of rows stored
    pub imported: usize,
    /// Rows skipped because the name already exists
    pub duplicates_skipped: usize,
    /// Number of rows with errors
    pub errors: usize,
    /// Display IDs of stored obligations
    pub imported_ids: Vec<String>,
    /// Error messages by row
    pub error_messages: BTreeMap<usize, String>,
}

/// Parse a file in the given (or guessed) format
pub fn parse_file(path: &Path, format: Option<ImportFormat>, kind: ImportKind) -> BillflowResult<Vec<ParsedRow>> {
    let format = format
        .or_else(|| ImportFormat::from_path(path))
        .ok_or_else(|| {
            BillflowError::Import(format!(
                "Cannot tell the format of '{}'; pass --format json or --format csv",
                path.display()
            ))
        })?;

    let file = File::open(path)
        .map_err(|e| BillflowError::Import(format!("Failed to open {}: {}", path.display(), e)))?;

    match format {
        ImportFormat::Json => parse_json(file, kind),
        ImportFormat::Csv => parse_csv(file, kind),
    }
}

/// Parse a JSON array of bill or subscription rows
pub fn parse_json<R: Read>(reader: R, kind: ImportKind) -> BillflowResult<Vec<ParsedRow>> {
    let values: Vec<serde_json::Value> = serde_json::from_reader(reader)
        .map_err(|e| BillflowError::Import(format!("Expected a JSON array of rows: {}", e)))?;

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let result = match kind {
                ImportKind::Bill => serde_json::from_value::<BillRecord>(value)
                    .map_err(BillflowError::from)
                    .and_then(Bill::try_from)
                    .map(Obligation::Bill),
                ImportKind::Subscription => serde_json::from_value::<SubscriptionRecord>(value)
                    .map_err(BillflowError::from)
                    .and_then(Subscription::try_from)
                    .map(Obligation::Subscription),
            };
            ParsedRow {
                row_number: idx + 1,
                result: result.map_err(|e| e.to_string()),
            }
        })
        .collect())
}

/// Parse CSV rows with a `name,category,amount,due_date[,recurring]` header
///
/// Header names are matched case-insensitively and accept the same aliases
/// as the JSON rows (`dueDate`, `cost`, `billing_cycle`...).
pub fn parse_csv<R: Read>(reader: R, kind: ImportKind) -> BillflowResult<Vec<ParsedRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| BillflowError::Import(format!("Failed to read CSV header: {}", e)))?
        .clone();
    let columns = CsvColumns::detect(&headers);
    if columns.name.is_none() || columns.amount.is_none() {
        return Err(BillflowError::Import(
            "CSV header must include at least 'name' and 'amount' columns".into(),
        ));
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let result = match record {
            Ok(record) => columns.to_obligation(&record, kind).map_err(|e| e.to_string()),
            Err(e) => Err(format!("Error reading CSV record: {}", e)),
        };
        rows.push(ParsedRow {
            row_number: idx + 1,
            result,
        });
    }
    Ok(rows)
}

/// Column positions found in a CSV header
#[derive(Debug, Default)]
struct CsvColumns {
    name: Option<usize>,
    category: Option<usize>,
    amount: Option<usize>,
    date: Option<usize>,
    recurring: Option<usize>,
    billing_cycle: Option<usize>,
    previous_amount: Option<usize>,
    usage: Option<usize>,
}

impl CsvColumns {
    fn detect(headers: &StringRecord) -> Self {
        let mut columns = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            let h: String = header
                .to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect();

            let slot = match h.as_str() {
                "name" | "description" => &mut columns.name,
                "category" => &mut columns.category,
                "amount" | "cost" | "price" => &mut columns.amount,
                "duedate" | "due" | "date" | "nextbillingdate" => &mut columns.date,
                "recurring" | "isrecurring" => &mut columns.recurring,
                "billingcycle" | "cycle" | "frequency" => &mut columns.billing_cycle,
                "previousamount" | "previouscost" => &mut columns.previous_amount,
                "usage" | "usagepermonth" => &mut columns.usage,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(idx);
            }
        }

        columns
    }

    fn field(record: &StringRecord, column: Option<usize>) -> Option<String> {
        column
            .and_then(|c| record.get(c))
            .map(str::to_string)
            .filter(|s| !s.is_empty())
    }

    fn to_obligation(&self, record: &StringRecord, kind: ImportKind) -> BillflowResult<Obligation> {
        let name = Self::field(record, self.name);
        let category = Self::field(record, self.category);
        let amount = Self::field(record, self.amount).map(RawAmount::Text);
        let date = Self::field(record, self.date);

        match kind {
            ImportKind::Bill => {
                let recurring = Self::field(record, self.recurring)
                    .map(|v| parse_flag(&v))
                    .transpose()?;
                let row = BillRecord {
                    name,
                    category,
                    amount,
                    due_date: date,
                    recurring,
                    ..Default::default()
                };
                Ok(Obligation::Bill(Bill::try_from(row)?))
            }
            ImportKind::Subscription => {
                let usage_per_month = Self::field(record, self.usage)
                    .map(|v| {
                        v.parse::<u32>().map_err(|_| {
                            BillflowError::InvalidInput(format!("usage is not a whole number: '{}'", v))
                        })
                    })
                    .transpose()?;
                let row = SubscriptionRecord {
                    name,
                    category,
                    amount,
                    next_billing_date: date,
                    billing_cycle: Self::field(record, self.billing_cycle),
                    previous_amount: Self::field(record, self.previous_amount).map(RawAmount::Text),
                    usage_per_month,
                    ..Default::default()
                };
                Ok(Obligation::Subscription(Subscription::try_from(row)?))
            }
        }
    }
}

fn parse_flag(value: &str) -> BillflowResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(BillflowError::Validation(format!(
            "recurring must be true or false, got '{}'",
            other
        ))),
    }
}

/// Service for storing imported rows
pub struct ImportService<'a> {
    storage: &'a Storage,
    user: UserId,
}

impl<'a> ImportService<'a> {
    /// Create a new import service acting for `user`
    pub fn new(storage: &'a Storage, user: UserId) -> Self {
        Self { storage, user }
    }

    /// Store every valid row; duplicates by name are skipped
    pub fn import(&self, rows: &[ParsedRow]) -> BillflowResult<ImportResult> {
        let bills = BillService::new(self.storage, self.user);
        let subscriptions = SubscriptionService::new(self.storage, self.user);
        let mut result = ImportResult::default();

        for row in rows {
            let stored = match &row.result {
                Ok(Obligation::Bill(bill)) => bills.insert(bill.clone()).map(|b| b.id.to_string()),
                Ok(Obligation::Subscription(sub)) => {
                    subscriptions.insert(sub.clone()).map(|s| s.id.to_string())
                }
                Err(message) => {
                    warn!(row = row.row_number, error = %message, "skipping invalid import row");
                    result.errors += 1;
                    result.error_messages.insert(row.row_number, message.clone());
                    continue;
                }
            };

            match stored {
                Ok(id) => {
                    result.imported += 1;
                    result.imported_ids.push(id);
                }
                Err(BillflowError::Duplicate { identifier, .. }) => {
                    warn!(row = row.row_number, name = %identifier, "skipping duplicate import row");
                    result.duplicates_skipped += 1;
                }
                Err(e @ (BillflowError::Validation(_) | BillflowError::InvalidInput(_))) => {
                    result.errors += 1;
                    result.error_messages.insert(row.row_number, e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            user = %self.user,
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            errors = result.errors,
            "import finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BillflowPaths;
    use crate::models::{BillingCycle, FALLBACK_CATEGORY};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillflowPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_parse_csv_bills() {
        let data = "Name,Category,Amount,Due Date,Recurring\n\
                    Rent,Housing,\"$1,200.00\",2024-03-01,true\n\
                    Repair,,250,2024-03-14,no\n\
                    Broken,Utilities,abc,2024-03-02,\n";
        let rows = parse_csv(data.as_bytes(), ImportKind::Bill).unwrap();

        assert_eq!(rows.len(), 3);
        let Ok(Obligation::Bill(rent)) = &rows[0].result else {
            panic!("expected a bill");
        };
        assert_eq!(rent.amount.cents(), 120000);
        assert!(rent.recurring);

        let Ok(Obligation::Bill(repair)) = &rows[1].result else {
            panic!("expected a bill");
        };
        assert_eq!(repair.category, FALLBACK_CATEGORY);
        assert!(!repair.recurring);

        assert!(rows[2].result.is_err());
        assert_eq!(rows[2].row_number, 3);
    }

    #[test]
    fn test_parse_csv_requires_name_and_amount() {
        let data = "title,due_date\nRent,2024-03-01\n";
        assert!(parse_csv(data.as_bytes(), ImportKind::Bill).is_err());
    }

    #[test]
    fn test_parse_csv_subscriptions() {
        let data = "name,category,cost,next_billing_date,billing_cycle,usage\n\
                    Adobe,Software,54.99,2024-03-20,yearly,3\n";
        let rows = parse_csv(data.as_bytes(), ImportKind::Subscription).unwrap();

        let Ok(Obligation::Subscription(sub)) = &rows[0].result else {
            panic!("expected a subscription");
        };
        assert_eq!(sub.billing_cycle, BillingCycle::Yearly);
        assert_eq!(sub.usage_per_month, Some(3));
        assert_eq!(sub.next_billing_date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
    }

    #[test]
    fn test_parse_json() {
        let data = r#"[
            {"name": "Electric", "category": "Utilities", "amount": 85.5, "dueDate": "2024-03-12"},
            {"name": "", "amount": 10, "due_date": "2024-03-12"},
            {"name": "Water", "amount": "NaN", "due_date": "2024-03-12"}
        ]"#;
        let rows = parse_json(data.as_bytes(), ImportKind::Bill).unwrap();

        assert!(rows[0].result.is_ok());
        assert!(rows[1].result.is_err());
        assert!(rows[2].result.is_err());
    }

    #[test]
    fn test_parse_json_not_an_array() {
        let err = parse_json(r#"{"name": "x"}"#.as_bytes(), ImportKind::Bill).unwrap_err();
        assert!(matches!(err, BillflowError::Import(_)));
    }

    #[test]
    fn test_import_skips_duplicates_and_errors() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserId::new();
        let service = ImportService::new(&storage, user);

        let data = "name,category,amount,due_date\n\
                    Rent,Housing,1200,2024-03-01\n\
                    Power,Utilities,90,2024-03-18\n\
                    rent,Housing,1200,2024-03-01\n\
                    Bad,Utilities,-5,2024-03-18\n";
        let rows = parse_csv(data.as_bytes(), ImportKind::Bill).unwrap();
        let result = service.import(&rows).unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.duplicates_skipped, 1);
        assert_eq!(result.errors, 1);
        assert!(result.error_messages.contains_key(&4));
        assert_eq!(storage.bills.count(&user).unwrap(), 2);

        // Importing again stores nothing new
        let again = service.import(&rows).unwrap();
        assert_eq!(again.imported, 0);
        assert_eq!(again.duplicates_skipped, 3);
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ImportFormat::from_path(Path::new("bills.CSV")), Some(ImportFormat::Csv));
        assert_eq!(ImportFormat::from_path(Path::new("rows.json")), Some(ImportFormat::Json));
        assert_eq!(ImportFormat::from_path(Path::new("rows.txt")), None);
        assert_eq!(ImportKind::parse("subs"), Some(ImportKind::Subscription));
    }
}
