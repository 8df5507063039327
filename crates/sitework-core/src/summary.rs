//! Contract financial summary.
//!
//! Derives the consultant fee, extra-fee rider and net figures for the
//! total contract, the bank-financed share and the owner-financed share,
//! then folds in variation orders. Everything is recomputed from the two
//! inputs on every call; nothing here is stored.
//!
//! # Algorithm
//!
//! 1. Gross split: bank share only for the housing loan program; the owner
//!    share is the remainder, or the stored owner value while it still
//!    matches the remainder within [`OWNER_VALUE_TOLERANCE`]. Other
//!    classifications ignore any stored owner value.
//! 2. Per-side percentage: design + supervision (+ rider value when the
//!    rider is a percentage), zero unless the side bundles the consultant.
//! 3. Blended total percentage for display (see [`blended_percent`]).
//! 4. Inclusive-fee extraction per view, rounded per step.
//! 5. Riders per side, 5% VAT on the rider only, deducted from the net.
//! 6. The total fee is the sum of the side fees, not the blended result.
//! 7. Variations are added to the contractor and payable figures.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::SummaryError;
use crate::coerce::round;
use crate::fee::{FeeSplit, embedded_fee, fee_inclusive};
use crate::model::{Contract, ExtraMode, SideTerms, Variation};
use crate::vat::VAT_RATE;

/// Stored owner values within this distance of the live split are trusted.
///
/// Only housing loan contracts consult the stored value; every other
/// classification takes the whole contract value as the owner share.
pub const OWNER_VALUE_TOLERANCE: f64 = 0.01;

/// Side percentages closer than this are treated as equal.
pub const PERCENT_EPSILON: f64 = 1e-6;

/// Fee, rider and net for one view of the contract.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBreakdown {
    /// Base consultant fee (design + supervision). Never includes the rider.
    pub fee: f64,
    /// What is left for the contractor after the fee and the VAT-burdened rider.
    pub net: f64,
    pub extra_fee: f64,
    pub extra_fee_with_vat: f64,
    pub extra_description: String,
}

/// Derived financial figures for one contract and its variations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSummary {
    pub gross_total: f64,
    pub gross_bank: f64,
    pub gross_owner: f64,

    pub owner_pct: f64,
    pub bank_pct: f64,
    /// Blended percentage for the total table. Display only.
    pub total_pct: f64,

    pub total: ShareBreakdown,
    pub bank: ShareBreakdown,
    pub owner: ShareBreakdown,

    pub payable_amount: f64,
    pub total_variations_amount: f64,
    pub actual_contractor_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Rider {
    fee: f64,
    with_vat: f64,
}

/// Effective consultant percentage for one side.
///
/// A percentage rider counts toward the side percentage as well as being
/// charged separately on the net.
pub fn side_percent(terms: &SideTerms<'_>) -> f64 {
    if !terms.includes_consultant {
        return 0.0;
    }
    let mut pct = terms.design_percent + terms.supervision_percent;
    if terms.extra_mode == ExtraMode::Percent {
        pct += terms.extra_value;
    }
    pct
}

/// Percentage that, applied inclusively to `gross_total`, reproduces the
/// combined owner and bank fees.
///
/// Equal positive percentages pass through. Unequal ones are weighted by
/// each side's unrounded fee: `Σfee / (gross_total − Σfee) × 100`. When
/// only one side carries a fee its percentage is used as is.
pub fn blended_percent(
    gross_total: f64,
    gross_owner: f64,
    owner_pct: f64,
    gross_bank: f64,
    bank_pct: f64,
) -> f64 {
    match (owner_pct > 0.0, bank_pct > 0.0) {
        (true, true) if (owner_pct - bank_pct).abs() < PERCENT_EPSILON => owner_pct,
        (true, true) => {
            let fees = embedded_fee(gross_owner, owner_pct) + embedded_fee(gross_bank, bank_pct);
            let total_net = gross_total - fees;
            let pct = if total_net > 0.0 {
                fees / total_net * 100.0
            } else {
                0.0
            };
            debug!(owner_pct, bank_pct, fees, total_net, pct, "blended total percentage");
            pct
        }
        (true, false) => owner_pct,
        (false, true) => bank_pct,
        (false, false) => 0.0,
    }
}

/// The side's rider, or `None` when it does not apply.
fn rider(terms: &SideTerms<'_>, provisional_net: f64) -> Option<Rider> {
    if !terms.includes_consultant || terms.extra_value <= 0.0 {
        return None;
    }
    let fee = match terms.extra_mode {
        ExtraMode::Percent => round(provisional_net * (terms.extra_value / 100.0)),
        ExtraMode::Fixed => terms.extra_value,
        ExtraMode::Unset => return None,
    };
    Some(Rider {
        fee,
        with_vat: round(fee * (1.0 + VAT_RATE)),
    })
}

fn finalize_side(terms: &SideTerms<'_>, split: FeeSplit) -> ShareBreakdown {
    let rider = rider(terms, split.net);
    let extra_description = if rider.is_some() {
        terms.extra_description.trim().to_string()
    } else {
        String::new()
    };
    let rider = rider.unwrap_or_default();
    ShareBreakdown {
        fee: split.fee,
        net: split.net - rider.with_vat,
        extra_fee: rider.fee,
        extra_fee_with_vat: rider.with_vat,
        extra_description,
    }
}

/// Sum of the burdened amounts of all variations.
pub fn total_variations(variations: &[Variation]) -> f64 {
    variations.iter().map(|v| v.net_amount_with_vat).sum()
}

/// Compute the financial summary for `contract` and its `variations`.
///
/// Total, deterministic, and free of side effects.
pub fn summarize(contract: &Contract, variations: &[Variation]) -> ContractSummary {
    let classification = contract.contract_classification;
    let gross_total = contract.total_project_value;
    let gross_bank = if classification.has_bank_share() {
        contract.total_bank_value
    } else {
        0.0
    };
    let gross_owner = if classification.has_bank_share() {
        let calculated = (gross_total - gross_bank).max(0.0);
        match contract.total_owner_value {
            Some(stored) if (stored - calculated).abs() <= OWNER_VALUE_TOLERANCE => stored,
            _ => calculated,
        }
    } else {
        gross_total
    };

    let owner_terms = contract.owner_terms();
    let bank_terms = contract.bank_terms();
    let owner_pct = side_percent(&owner_terms);
    let bank_pct = side_percent(&bank_terms);
    let total_pct = blended_percent(gross_total, gross_owner, owner_pct, gross_bank, bank_pct);

    let total_split = fee_inclusive(gross_total, total_pct);
    let bank = finalize_side(&bank_terms, fee_inclusive(gross_bank, bank_pct));
    let owner = finalize_side(&owner_terms, fee_inclusive(gross_owner, owner_pct));

    let total_extra_fee = owner.extra_fee + bank.extra_fee;
    let total_extra_with_vat = owner.extra_fee_with_vat + bank.extra_fee_with_vat;
    let total_description = [owner.extra_description.as_str(), bank.extra_description.as_str()]
        .into_iter()
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(" / ");
    let total = ShareBreakdown {
        fee: owner.fee + bank.fee,
        net: total_split.net - total_extra_with_vat,
        extra_fee: total_extra_fee,
        extra_fee_with_vat: total_extra_with_vat,
        extra_description: total_description,
    };

    let total_variations_amount = total_variations(variations);
    let actual_contractor_amount = total.net + total_variations_amount;
    let payable_amount = (gross_owner + bank.net) + total_variations_amount;

    ContractSummary {
        gross_total,
        gross_bank,
        gross_owner,
        owner_pct,
        bank_pct,
        total_pct,
        total,
        bank,
        owner,
        payable_amount,
        total_variations_amount,
        actual_contractor_amount,
    }
}

/// Summarize raw JSON as received from the API.
///
/// A `null` contract means "no data yet" and yields `Ok(None)`. Any other
/// non-object contract, or variations that are not an array, are upstream
/// contract violations and fail as a whole.
pub fn summarize_value(
    contract: &Value,
    variations: &Value,
) -> Result<Option<ContractSummary>, SummaryError> {
    let contract: Contract = match contract {
        Value::Null => return Ok(None),
        Value::Object(_) => Contract::deserialize(contract)?,
        other => return Err(SummaryError::ContractNotObject(kind(other))),
    };
    let variations: Vec<Variation> = match variations {
        Value::Array(_) => Vec::<Variation>::deserialize(variations)?,
        other => return Err(SummaryError::VariationsNotList(kind(other))),
    };
    Ok(Some(summarize(&contract, &variations)))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
