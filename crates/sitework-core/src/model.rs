//! Contract and variation records as served by the project API.
//!
//! Every numeric field is coerced through [`crate::coerce`] at
//! deserialization, so the API may send numbers or formatted strings.
//! Fields that the summary does not use are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::lenient;

/// How a contract is financed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Value")]
pub enum Classification {
    /// Split between a bank-financed share and an owner-financed share.
    HousingLoanProgram,
    PrivateFunding,
    /// Empty, missing, non-string, or any value the API adds later.
    #[default]
    Unclassified,
}

impl From<Value> for Classification {
    fn from(raw: Value) -> Self {
        match raw.as_str().map(str::trim) {
            Some("housing_loan_program") => Self::HousingLoanProgram,
            Some("private_funding") => Self::PrivateFunding,
            _ => Self::Unclassified,
        }
    }
}

impl Classification {
    /// Whether part of the contract value is carried by the bank.
    pub fn has_bank_share(self) -> bool {
        matches!(self, Self::HousingLoanProgram)
    }
}

/// How a consultant's extra fee ("rider") is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Value")]
pub enum ExtraMode {
    /// Percentage of the side's net after the base consultant fee.
    Percent,
    /// Flat amount.
    Fixed,
    #[default]
    Unset,
}

impl From<Value> for ExtraMode {
    fn from(raw: Value) -> Self {
        match raw.as_str().map(str::trim) {
            Some("percent") => Self::Percent,
            Some("fixed") => Self::Fixed,
            _ => Self::Unset,
        }
    }
}

/// A contract as returned by the contracts endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contract {
    #[serde(deserialize_with = "lenient::opt_id")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_id")]
    pub project: Option<u64>,

    #[serde(deserialize_with = "lenient::amount")]
    pub total_project_value: f64,
    pub contract_classification: Classification,
    #[serde(deserialize_with = "lenient::amount")]
    pub total_bank_value: f64,
    /// Stored owner share; trusted only while it matches the live split.
    #[serde(deserialize_with = "lenient::opt_amount")]
    pub total_owner_value: Option<f64>,

    #[serde(deserialize_with = "lenient::flag")]
    pub owner_includes_consultant: bool,
    #[serde(deserialize_with = "lenient::amount")]
    pub owner_fee_design_percent: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub owner_fee_supervision_percent: f64,
    pub owner_fee_extra_mode: ExtraMode,
    #[serde(deserialize_with = "lenient::amount")]
    pub owner_fee_extra_value: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub owner_fee_extra_description: String,

    #[serde(deserialize_with = "lenient::flag")]
    pub bank_includes_consultant: bool,
    #[serde(deserialize_with = "lenient::amount")]
    pub bank_fee_design_percent: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub bank_fee_supervision_percent: f64,
    pub bank_fee_extra_mode: ExtraMode,
    #[serde(deserialize_with = "lenient::amount")]
    pub bank_fee_extra_value: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub bank_fee_extra_description: String,
}

/// Consultant fee terms for one financing side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideTerms<'a> {
    pub includes_consultant: bool,
    pub design_percent: f64,
    pub supervision_percent: f64,
    pub extra_mode: ExtraMode,
    pub extra_value: f64,
    pub extra_description: &'a str,
}

impl Contract {
    pub fn owner_terms(&self) -> SideTerms<'_> {
        SideTerms {
            includes_consultant: self.owner_includes_consultant,
            design_percent: self.owner_fee_design_percent,
            supervision_percent: self.owner_fee_supervision_percent,
            extra_mode: self.owner_fee_extra_mode,
            extra_value: self.owner_fee_extra_value,
            extra_description: &self.owner_fee_extra_description,
        }
    }

    pub fn bank_terms(&self) -> SideTerms<'_> {
        SideTerms {
            includes_consultant: self.bank_includes_consultant,
            design_percent: self.bank_fee_design_percent,
            supervision_percent: self.bank_fee_supervision_percent,
            extra_mode: self.bank_fee_extra_mode,
            extra_value: self.bank_fee_extra_value,
            extra_description: &self.bank_fee_extra_description,
        }
    }
}

/// A price-variation (change) order. Only the burdened amount is used.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Variation {
    #[serde(deserialize_with = "lenient::opt_id")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_id")]
    pub project: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_id")]
    pub contract: Option<u64>,
    #[serde(deserialize_with = "lenient::amount")]
    pub net_amount_with_vat: f64,
}
