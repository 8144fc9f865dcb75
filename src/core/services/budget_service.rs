//! BOQ intake and budget aggregation for a milestone.

use serde::{Deserialize, Serialize};

use crate::domain::common::valid_money;
use crate::domain::{BoqItem, CostCategory, DbId, EtoEntry, LtoEntry, MtoEntry};
use crate::errors::{CoreError, Result};
use crate::ledger::ProjectBook;

/// Budget distribution of one milestone, computed from its BOQ items.
///
/// The three totals sum the child take-off entries; `total_budget` is their
/// sum, counting zero categories as zero. `by_category` lists only non-zero
/// categories so chart views can omit empty slices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetDistribution {
    pub milestone_id: DbId,
    pub total_mto: f64,
    pub total_lto: f64,
    pub total_eto: f64,
    pub total_budget: f64,
    pub by_category: Vec<CategoryTotal>,
}

/// One non-zero slice of the distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: CostCategory,
    pub total: f64,
}

/// Estimator total next to take-off total, for the side-by-side view.
/// The two figures are independently authored and intentionally not
/// reconciled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoqComparison {
    pub milestone_id: DbId,
    pub estimator_total: f64,
    pub takeoff_total: f64,
}

/// Stateless budgeting operations over [`ProjectBook`] snapshots.
pub struct BudgetService;

impl BudgetService {
    /// Adds a BOQ line item to a milestone and returns its id.
    #[allow(clippy::too_many_arguments)]
    pub fn add_boq_item(
        book: &mut ProjectBook,
        milestone_id: DbId,
        item_no: &str,
        description: &str,
        quantity: f64,
        unit: &str,
        unit_cost: f64,
    ) -> Result<DbId> {
        Self::ensure_milestone_exists(book, milestone_id)?;
        if description.trim().is_empty() {
            return Err(CoreError::Validation("item description is required".into()));
        }
        if !valid_money(quantity) {
            return Err(CoreError::Validation("quantity must be positive".into()));
        }
        if !unit_cost.is_finite() || unit_cost < 0.0 {
            return Err(CoreError::Validation(
                "unit cost must be zero or positive".into(),
            ));
        }
        let id = book.allocate_id();
        book.add_boq_item(BoqItem::new(
            id,
            milestone_id,
            item_no,
            description,
            quantity,
            unit,
            unit_cost,
        ));
        Ok(id)
    }

    /// Appends a material take-off entry to a BOQ item.
    pub fn add_mto(
        book: &mut ProjectBook,
        item_id: DbId,
        description: &str,
        unit: &str,
        quantity: f64,
        unit_cost: f64,
    ) -> Result<DbId> {
        if !valid_money(quantity) {
            return Err(CoreError::Validation("quantity must be positive".into()));
        }
        if !unit_cost.is_finite() || unit_cost < 0.0 {
            return Err(CoreError::Validation(
                "unit cost must be zero or positive".into(),
            ));
        }
        Self::ensure_item_exists(book, item_id)?;
        let entry_id = book.allocate_id();
        let item = Self::item_mut(book, item_id)?;
        item.mto
            .push(MtoEntry::new(entry_id, description, unit, quantity, unit_cost));
        book.touch();
        Ok(entry_id)
    }

    /// Appends a labor take-off entry (flat total) to a BOQ item.
    pub fn add_lto(
        book: &mut ProjectBook,
        item_id: DbId,
        description: &str,
        remarks: Option<&str>,
        total_cost: f64,
    ) -> Result<DbId> {
        if !total_cost.is_finite() || total_cost < 0.0 {
            return Err(CoreError::Validation(
                "labor total must be zero or positive".into(),
            ));
        }
        Self::ensure_item_exists(book, item_id)?;
        let entry_id = book.allocate_id();
        let item = Self::item_mut(book, item_id)?;
        let mut entry = LtoEntry::new(entry_id, description, total_cost);
        if let Some(remarks) = remarks {
            entry = entry.with_remarks(remarks);
        }
        item.lto.push(entry);
        book.touch();
        Ok(entry_id)
    }

    /// Appends an equipment take-off entry to a BOQ item.
    pub fn add_eto(
        book: &mut ProjectBook,
        item_id: DbId,
        equipment_name: &str,
        days: f64,
        daily_rate: f64,
    ) -> Result<DbId> {
        if !valid_money(days) {
            return Err(CoreError::Validation("rental days must be positive".into()));
        }
        if !daily_rate.is_finite() || daily_rate < 0.0 {
            return Err(CoreError::Validation(
                "daily rate must be zero or positive".into(),
            ));
        }
        Self::ensure_item_exists(book, item_id)?;
        let entry_id = book.allocate_id();
        let item = Self::item_mut(book, item_id)?;
        item.eto
            .push(EtoEntry::new(entry_id, equipment_name, days, daily_rate));
        book.touch();
        Ok(entry_id)
    }

    /// Re-prices a BOQ item; `total_cost` is recomputed, never left stale.
    pub fn set_quantity(book: &mut ProjectBook, item_id: DbId, quantity: f64) -> Result<()> {
        if !valid_money(quantity) {
            return Err(CoreError::Validation("quantity must be positive".into()));
        }
        Self::item_mut(book, item_id)?.set_quantity(quantity);
        book.touch();
        Ok(())
    }

    /// Re-prices a BOQ item; `total_cost` is recomputed, never left stale.
    pub fn set_unit_cost(book: &mut ProjectBook, item_id: DbId, unit_cost: f64) -> Result<()> {
        if !unit_cost.is_finite() || unit_cost < 0.0 {
            return Err(CoreError::Validation(
                "unit cost must be zero or positive".into(),
            ));
        }
        Self::item_mut(book, item_id)?.set_unit_cost(unit_cost);
        book.touch();
        Ok(())
    }

    /// Computes the budget distribution of a milestone from its BOQ items.
    ///
    /// Pure read with no side effects. A milestone without items yields all
    /// zeros, which is a valid distribution, not an error.
    pub fn aggregate(book: &ProjectBook, milestone_id: DbId) -> Result<BudgetDistribution> {
        Self::ensure_milestone_exists(book, milestone_id)?;
        let mut total_mto = 0.0;
        let mut total_lto = 0.0;
        let mut total_eto = 0.0;
        for item in book.boq_items_for(milestone_id) {
            total_mto += item.mto.iter().map(|entry| entry.total_cost).sum::<f64>();
            total_lto += item.lto.iter().map(|entry| entry.total_cost).sum::<f64>();
            total_eto += item.eto.iter().map(|entry| entry.total_cost).sum::<f64>();
        }
        let by_category = [
            (CostCategory::Materials, total_mto),
            (CostCategory::Labor, total_lto),
            (CostCategory::Equipment, total_eto),
        ]
        .into_iter()
        .filter(|(_, total)| *total != 0.0)
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
        Ok(BudgetDistribution {
            milestone_id,
            total_mto,
            total_lto,
            total_eto,
            total_budget: total_mto + total_lto + total_eto,
            by_category,
        })
    }

    /// Returns the estimator's BOQ total alongside the take-off total.
    pub fn boq_comparison(book: &ProjectBook, milestone_id: DbId) -> Result<BoqComparison> {
        Self::ensure_milestone_exists(book, milestone_id)?;
        let mut estimator_total = 0.0;
        let mut takeoff_total = 0.0;
        for item in book.boq_items_for(milestone_id) {
            estimator_total += item.total_cost;
            takeoff_total += item.takeoff_total();
        }
        Ok(BoqComparison {
            milestone_id,
            estimator_total,
            takeoff_total,
        })
    }

    /// Returns a snapshot of the BOQ items of a milestone.
    pub fn list(book: &ProjectBook, milestone_id: DbId) -> Result<Vec<&BoqItem>> {
        Self::ensure_milestone_exists(book, milestone_id)?;
        Ok(book.boq_items_for(milestone_id).collect())
    }

    fn item_mut(book: &mut ProjectBook, item_id: DbId) -> Result<&mut BoqItem> {
        book.boq_item_mut(item_id).ok_or(CoreError::NotFound {
            entity: "BOQ item",
            id: item_id,
        })
    }

    fn ensure_item_exists(book: &ProjectBook, item_id: DbId) -> Result<()> {
        if book.boq_item(item_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "BOQ item",
                id: item_id,
            });
        }
        Ok(())
    }

    fn ensure_milestone_exists(book: &ProjectBook, milestone_id: DbId) -> Result<()> {
        if book.milestone(milestone_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "milestone",
                id: milestone_id,
            });
        }
        Ok(())
    }
}
