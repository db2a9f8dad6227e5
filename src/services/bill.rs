//! Bill service
//!
//! CRUD for one user's bills, with validation and duplicate-name checks.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{BillflowError, BillflowResult};
use crate::models::{Bill, Money, UserId};
use crate::storage::Storage;

/// Service for bill management
pub struct BillService<'a> {
    storage: &'a Storage,
    user: UserId,
}

impl<'a> BillService<'a> {
    /// Create a new bill service acting for `user`
    pub fn new(storage: &'a Storage, user: UserId) -> Self {
        Self { storage, user }
    }

    /// Create a new bill
    pub fn create(
        &self,
        name: &str,
        category: &str,
        amount: Money,
        due_date: NaiveDate,
        recurring: bool,
    ) -> BillflowResult<Bill> {
        let mut bill = Bill::new(name.trim(), category.trim(), amount, due_date);
        bill.recurring = recurring;
        self.insert(bill)
    }

    /// Store an already-built bill after validating it
    pub fn insert(&self, bill: Bill) -> BillflowResult<Bill> {
        bill.validate()
            .map_err(|e| BillflowError::Validation(e.to_string()))?;

        if self.storage.bills.name_exists(&self.user, &bill.name, None)? {
            return Err(BillflowError::Duplicate {
                entity_type: "Bill",
                identifier: bill.name.clone(),
            });
        }

        self.storage.bills.upsert(&self.user, bill.clone())?;
        self.storage.bills.save()?;

        info!(user = %self.user, bill = %bill.id, name = %bill.name, "created bill");
        Ok(bill)
    }

    /// Find a bill by name or ID prefix
    pub fn find(&self, identifier: &str) -> BillflowResult<Option<Bill>> {
        self.storage.bills.find(&self.user, identifier)
    }

    /// All bills, ordered by due date
    pub fn list(&self) -> BillflowResult<Vec<Bill>> {
        self.storage.bills.list(&self.user)
    }

    /// Change the amount and/or due date of a bill
    pub fn update(
        &self,
        identifier: &str,
        amount: Option<Money>,
        due_date: Option<NaiveDate>,
    ) -> BillflowResult<Bill> {
        let mut bill = self
            .find(identifier)?
            .ok_or_else(|| BillflowError::bill_not_found(identifier))?;

        if let Some(amount) = amount {
            bill.amount = amount;
        }
        if let Some(due_date) = due_date {
            bill.due_date = due_date;
        }
        bill.updated_at = chrono::Utc::now();

        bill.validate()
            .map_err(|e| BillflowError::Validation(e.to_string()))?;

        self.storage.bills.upsert(&self.user, bill.clone())?;
        self.storage.bills.save()?;

        info!(user = %self.user, bill = %bill.id, "updated bill");
        Ok(bill)
    }

    /// Delete a bill
    pub fn remove(&self, identifier: &str) -> BillflowResult<Bill> {
        let bill = self
            .find(identifier)?
            .ok_or_else(|| BillflowError::bill_not_found(identifier))?;

        self.storage.bills.delete(&self.user, bill.id)?;
        self.storage.bills.save()?;

        info!(user = %self.user, bill = %bill.id, name = %bill.name, "removed bill");
        Ok(bill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BillflowPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillflowPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_create_bill() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage, UserId::new());

        let bill = service
            .create("  Electric ", "Utilities", Money::from_cents(9000), day(12), true)
            .unwrap();

        assert_eq!(bill.name, "Electric");
        assert!(bill.recurring);
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_duplicate_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage, UserId::new());

        service
            .create("Rent", "Housing", Money::from_cents(100), day(1), true)
            .unwrap();
        let result = service.create("rent", "Housing", Money::from_cents(100), day(1), true);
        assert!(matches!(result, Err(BillflowError::Duplicate { .. })));
    }

    #[test]
    fn test_same_name_for_different_users() {
        let (_temp_dir, storage) = create_test_storage();
        BillService::new(&storage, UserId::new())
            .create("Rent", "Housing", Money::from_cents(100), day(1), true)
            .unwrap();
        assert!(BillService::new(&storage, UserId::new())
            .create("Rent", "Housing", Money::from_cents(100), day(1), true)
            .is_ok());
    }

    #[test]
    fn test_rejects_invalid_bill() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage, UserId::new());

        let err = service
            .create("", "Housing", Money::from_cents(100), day(1), true)
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .create("Refund", "Other", Money::from_cents(-1), day(1), true)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_update_and_remove() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BillService::new(&storage, UserId::new());
        service
            .create("Water", "Utilities", Money::from_cents(3000), day(20), true)
            .unwrap();

        let updated = service
            .update("water", Some(Money::from_cents(3500)), Some(day(21)))
            .unwrap();
        assert_eq!(updated.amount.cents(), 3500);
        assert_eq!(updated.due_date, day(21));

        let removed = service.remove("Water").unwrap();
        assert_eq!(removed.id, updated.id);
        assert!(service.list().unwrap().is_empty());
        assert!(service.remove("Water").unwrap_err().is_not_found());
    }
}
