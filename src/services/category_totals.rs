//! Category aggregation
//!
//! Rolls a payment schedule up into one total per category.

use tracing::debug;

use crate::models::{
    default_categories, Category, CategoryTotal, Money, PaymentSchedule, FALLBACK_CATEGORY,
};

/// Sums scheduled amounts per known category
#[derive(Debug, Clone)]
pub struct CategoryAggregator {
    categories: Vec<Category>,
}

impl Default for CategoryAggregator {
    fn default() -> Self {
        Self::new(default_categories())
    }
}

impl CategoryAggregator {
    /// Aggregate into `categories`, in table order
    ///
    /// This table is the set of known categories every later `aggregate`
    /// call maps items onto. `"Other"` is appended when the table does not already contain it.
    pub fn new(mut categories: Vec<Category>) -> Self {
        if !categories.iter().any(|c| c.matches(FALLBACK_CATEGORY)) {
            categories.push(Category::new(FALLBACK_CATEGORY, "#6B7280"));
        }
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Index of the table entry an item's category maps onto
    fn slot(&self, name: &str) -> usize {
        self.categories
            .iter()
            .position(|c| c.matches(name))
            .or_else(|| self.categories.iter().position(|c| c.matches(FALLBACK_CATEGORY)))
            .unwrap_or(self.categories.len() - 1)
    }

    /// One total per category that has any scheduled spend
    ///
    /// Item categories are matched against the known-category table given to
    /// [`CategoryAggregator::new`]. Unknown or blank categories count toward
    /// `"Other"`. Totals always sum to the schedule total.
    pub fn aggregate(&self, schedule: &[PaymentSchedule]) -> Vec<CategoryTotal> {
        let mut totals = vec![Money::zero(); self.categories.len()];

        for item in schedule.iter().flat_map(|entry| entry.items.iter()) {
            totals[self.slot(&item.category)] += item.amount;
        }

        let result: Vec<CategoryTotal> = self
            .categories
            .iter()
            .zip(totals)
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(category, amount)| CategoryTotal {
                category: category.name.clone(),
                amount,
            })
            .collect();

        debug!(categories = result.len(), "aggregated category totals");
        result
    }

    /// Color for a category name, falling back to the "Other" color
    pub fn color_of(&self, name: &str) -> &str {
        &self.categories[self.slot(name)].color
    }
}
