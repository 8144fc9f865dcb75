use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::common::*;

/// A Bill-of-Quantities line item: the estimator's itemized scope and cost
/// for one piece of a milestone.
///
/// `total_cost` always equals `quantity * unit_cost` and is recomputed by the
/// mutators, never stored stale. It is the estimator's own figure and is not
/// reconciled against the MTO/LTO/ETO child sums; callers surface both for
/// comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoqItem {
    pub id: DbId,
    pub milestone_id: DbId,
    pub item_no: String,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_cost: f64,
    pub total_cost: f64,
    #[serde(default)]
    pub mto: Vec<MtoEntry>,
    #[serde(default)]
    pub lto: Vec<LtoEntry>,
    #[serde(default, deserialize_with = "eto_one_or_many")]
    pub eto: Vec<EtoEntry>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BoqItem {
    pub fn new(
        id: DbId,
        milestone_id: DbId,
        item_no: impl Into<String>,
        description: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        unit_cost: f64,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            milestone_id,
            item_no: item_no.into(),
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_cost,
            total_cost: quantity * unit_cost,
            mto: Vec::new(),
            lto: Vec::new(),
            eto: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_quantity(&mut self, quantity: f64) {
        self.quantity = quantity;
        self.recompute_total();
    }

    pub fn set_unit_cost(&mut self, unit_cost: f64) {
        self.unit_cost = unit_cost;
        self.recompute_total();
    }

    fn recompute_total(&mut self) {
        self.total_cost = self.quantity * self.unit_cost;
        self.updated_at = chrono::Utc::now();
    }

    /// Sum of all child take-off totals, across the three categories.
    pub fn takeoff_total(&self) -> f64 {
        self.mto.iter().map(|entry| entry.total_cost).sum::<f64>()
            + self.lto.iter().map(|entry| entry.total_cost).sum::<f64>()
            + self.eto.iter().map(|entry| entry.total_cost).sum::<f64>()
    }
}

impl Identifiable for BoqItem {
    fn id(&self) -> DbId {
        self.id
    }
}

impl Displayable for BoqItem {
    fn display_label(&self) -> String {
        format!("{} {}", self.item_no, self.description)
    }
}

/// Material Take-Off entry. Total is quantity times unit cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MtoEntry {
    pub id: DbId,
    pub description: String,
    pub unit: String,
    pub quantity: f64,
    pub unit_cost: f64,
    pub total_cost: f64,
}

impl MtoEntry {
    pub fn new(
        id: DbId,
        description: impl Into<String>,
        unit: impl Into<String>,
        quantity: f64,
        unit_cost: f64,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            unit: unit.into(),
            quantity,
            unit_cost,
            total_cost: quantity * unit_cost,
        }
    }
}

/// Labor Take-Off entry. The total is a flat figure, not qty x rate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LtoEntry {
    pub id: DbId,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub total_cost: f64,
}

impl LtoEntry {
    pub fn new(id: DbId, description: impl Into<String>, total_cost: f64) -> Self {
        Self {
            id,
            description: description.into(),
            remarks: None,
            total_cost,
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

/// Equipment Take-Off entry. Total is rental days times daily rate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EtoEntry {
    pub id: DbId,
    pub equipment_name: String,
    pub days: f64,
    pub daily_rate: f64,
    pub total_cost: f64,
}

impl EtoEntry {
    pub fn new(id: DbId, equipment_name: impl Into<String>, days: f64, daily_rate: f64) -> Self {
        Self {
            id,
            equipment_name: equipment_name.into(),
            days,
            daily_rate,
            total_cost: days * daily_rate,
        }
    }
}

/// Accepts legacy single-object ETO payloads alongside the list form and
/// normalizes both to a list, so aggregation never sees the dual shape.
fn eto_one_or_many<'de, D>(deserializer: D) -> Result<Vec<EtoEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<EtoEntry>),
        One(EtoEntry),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(entries) => entries,
        OneOrMany::One(entry) => vec![entry],
    })
}
