//! Breakdown tables derived from a [`ContractSummary`].
//!
//! The contract screen shows the total, bank and owner breakdowns side by
//! side plus a combined VAT table. Every row carries its 5% VAT and the
//! VAT-inclusive figure computed the same way ([`crate::vat`]).
//! [`cross_check`] verifies that the tables agree with each other.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::fee::fee_inclusive;
use crate::summary::{ContractSummary, OWNER_VALUE_TOLERANCE, ShareBreakdown};
use crate::vat::{VAT_PERCENT, vat_on, with_vat};

/// What a row represents, independent of its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Gross,
    ConsultantFee,
    ExtraFee,
    ExtraFeeVat,
    Net,
    Variations,
    ActualContractor,
    Payable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub kind: RowKind,
    pub label: String,
    pub amount: f64,
    pub vat: f64,
    pub amount_with_vat: f64,
}

impl BreakdownRow {
    fn new(kind: RowKind, label: impl Into<String>, amount: f64) -> Self {
        Self {
            kind,
            label: label.into(),
            amount,
            vat: vat_on(amount),
            amount_with_vat: with_vat(amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownTable {
    pub title: String,
    pub rows: Vec<BreakdownRow>,
}

impl BreakdownTable {
    /// First row of the given kind.
    pub fn row(&self, kind: RowKind) -> Option<&BreakdownRow> {
        self.rows.iter().find(|r| r.kind == kind)
    }

    /// Amount of the first row of the given kind, or `0`.
    pub fn amount(&self, kind: RowKind) -> f64 {
        self.row(kind).map_or(0.0, |r| r.amount)
    }
}

fn share_table(title: &str, gross: f64, pct: f64, share: &ShareBreakdown) -> BreakdownTable {
    let mut rows = vec![
        BreakdownRow::new(RowKind::Gross, "Gross value", gross),
        BreakdownRow::new(
            RowKind::ConsultantFee,
            format!("Consultant fee ({pct:.2}%)"),
            share.fee,
        ),
    ];
    if share.extra_fee > 0.0 {
        let label = if share.extra_description.is_empty() {
            "Extra fee".to_string()
        } else {
            format!("Extra fee ({})", share.extra_description)
        };
        rows.push(BreakdownRow::new(RowKind::ExtraFee, label, share.extra_fee));
        rows.push(BreakdownRow::new(
            RowKind::ExtraFeeVat,
            format!("Extra fee VAT ({VAT_PERCENT}%)"),
            share.extra_fee_with_vat - share.extra_fee,
        ));
    }
    rows.push(BreakdownRow::new(RowKind::Net, "Net to contractor", share.net));
    BreakdownTable {
        title: title.to_string(),
        rows,
    }
}

/// Total, bank and owner breakdown tables, in display order.
///
/// The bank table is omitted when there is no bank share.
pub fn breakdown_tables(summary: &ContractSummary) -> Vec<BreakdownTable> {
    let mut tables = vec![share_table(
        "Total contract",
        summary.gross_total,
        summary.total_pct,
        &summary.total,
    )];
    if summary.gross_bank > 0.0 {
        tables.push(share_table(
            "Bank share",
            summary.gross_bank,
            summary.bank_pct,
            &summary.bank,
        ));
    }
    tables.push(share_table(
        "Owner share",
        summary.gross_owner,
        summary.owner_pct,
        &summary.owner,
    ));
    tables
}

/// Combined VAT table for the contract and its variations.
pub fn vat_table(summary: &ContractSummary) -> BreakdownTable {
    BreakdownTable {
        title: "VAT".to_string(),
        rows: vec![
            BreakdownRow::new(RowKind::Net, "Contract net", summary.total.net),
            BreakdownRow::new(
                RowKind::Variations,
                "Variations",
                summary.total_variations_amount,
            ),
            BreakdownRow::new(
                RowKind::ActualContractor,
                "Actual contractor amount",
                summary.actual_contractor_amount,
            ),
            BreakdownRow::new(RowKind::Payable, "Payable amount", summary.payable_amount),
        ],
    }
}

/// A reconciliation that failed between two breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Owner fee + rider with VAT + net equals the owner gross.
    OwnerReconciles,
    /// Bank fee + rider with VAT + net equals the bank gross.
    BankReconciles,
    TotalFeeIsSumOfSides,
    TotalRiderIsSumOfSides,
    /// Owner and bank gross add up to the contract value.
    GrossSplit,
    /// The blended percentage reproduces the summed fee within one unit.
    BlendedFee,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Check::OwnerReconciles => "owner share reconciles",
            Check::BankReconciles => "bank share reconciles",
            Check::TotalFeeIsSumOfSides => "total fee is sum of sides",
            Check::TotalRiderIsSumOfSides => "total rider is sum of sides",
            Check::GrossSplit => "gross split",
            Check::BlendedFee => "blended fee",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Discrepancy {
    pub check: Check,
    pub expected: f64,
    pub actual: f64,
}

const EXACT: f64 = 1e-6;

fn side_total(share: &ShareBreakdown) -> f64 {
    share.fee + share.extra_fee_with_vat + share.net
}

/// Reconcile the summary's breakdowns against each other.
///
/// Returns an empty list when every table agrees.
pub fn cross_check(summary: &ContractSummary) -> Vec<Discrepancy> {
    let mut found = Vec::new();
    let mut expect = |check: Check, expected: f64, actual: f64, tolerance: f64| {
        if (expected - actual).abs() > tolerance {
            warn!(%check, expected, actual, "breakdown tables disagree");
            found.push(Discrepancy {
                check,
                expected,
                actual,
            });
        }
    };

    expect(
        Check::OwnerReconciles,
        summary.gross_owner,
        side_total(&summary.owner),
        EXACT,
    );
    expect(
        Check::BankReconciles,
        summary.gross_bank,
        side_total(&summary.bank),
        EXACT,
    );
    expect(
        Check::TotalFeeIsSumOfSides,
        summary.owner.fee + summary.bank.fee,
        summary.total.fee,
        EXACT,
    );
    expect(
        Check::TotalRiderIsSumOfSides,
        summary.owner.extra_fee_with_vat + summary.bank.extra_fee_with_vat,
        summary.total.extra_fee_with_vat,
        EXACT,
    );
    if summary.gross_bank > 0.0 {
        expect(
            Check::GrossSplit,
            summary.gross_total,
            summary.gross_owner + summary.gross_bank,
            OWNER_VALUE_TOLERANCE,
        );
    }
    if summary.owner_pct > 0.0 && summary.bank_pct > 0.0 {
        expect(
            Check::BlendedFee,
            summary.total.fee,
            fee_inclusive(summary.gross_total, summary.total_pct).fee,
            1.0,
        );
    }

    found
}
