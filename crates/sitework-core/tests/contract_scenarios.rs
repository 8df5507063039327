use serde_json::{Value, json};
use sitework_core::{ContractSummary, cross_check, summarize_value};

fn housing_contract() -> Value {
    json!({
        "id": 7,
        "project": 3,
        "total_project_value": 1_050_000,
        "contract_classification": "housing_loan_program",
        "total_bank_value": 700_000,
        "owner_includes_consultant": true,
        "owner_fee_design_percent": 5,
        "owner_fee_supervision_percent": 5,
        "bank_includes_consultant": false
    })
}

fn run(contract: &Value, variations: Value) -> ContractSummary {
    summarize_value(contract, &variations)
        .expect("well-formed input")
        .expect("contract present")
}

#[test]
fn housing_loan_without_variations() {
    let s = run(&housing_contract(), json!([]));
    assert_eq!(s.gross_bank, 700_000.0);
    assert_eq!(s.gross_owner, 350_000.0);
    assert_eq!(s.owner_pct, 10.0);
    assert_eq!(s.owner.fee, 31_818.0);
    assert_eq!(s.owner.net, 318_182.0);
    assert_eq!(s.bank.fee, 0.0);
    assert_eq!(s.bank.net, 700_000.0);
    assert_eq!(s.total.fee, 31_818.0);
    assert_eq!(s.payable_amount, 1_050_000.0);
    assert!(cross_check(&s).is_empty());
}

#[test]
fn housing_loan_with_variations() {
    let s = run(
        &housing_contract(),
        json!([{"net_amount_with_vat": 21_000}, {"net_amount_with_vat": "5,000"}]),
    );
    assert_eq!(s.total_variations_amount, 26_000.0);
    assert_eq!(s.actual_contractor_amount, s.total.net + 26_000.0);
    assert_eq!(s.payable_amount, 1_076_000.0);
}

#[test]
fn fixed_rider_on_owner_side() {
    let base = run(&housing_contract(), json!([]));
    let mut contract = housing_contract();
    contract["owner_fee_extra_mode"] = json!("fixed");
    contract["owner_fee_extra_value"] = json!(10_000);
    let s = run(&contract, json!([]));
    assert_eq!(s.owner.extra_fee, 10_000.0);
    assert_eq!(s.owner.extra_fee_with_vat, 10_500.0);
    assert_eq!(s.owner.net, base.owner.net - 10_500.0);
    assert!(cross_check(&s).is_empty());
}

#[test]
fn private_funding_ignores_declared_split() {
    let mut contract = housing_contract();
    contract["contract_classification"] = json!("private_funding");
    contract["total_owner_value"] = json!("12");
    let s = run(&contract, json!([]));
    assert_eq!(s.gross_bank, 0.0);
    assert_eq!(s.gross_owner, s.gross_total);
}

#[test]
fn garbage_numbers_are_zero() {
    let contract = json!({
        "total_project_value": "to be confirmed",
        "contract_classification": "housing_loan_program",
        "total_bank_value": null,
        "owner_includes_consultant": "yes",
        "owner_fee_design_percent": ""
    });
    let s = run(&contract, json!([{"net_amount_with_vat": {}}]));
    assert_eq!(s.gross_total, 0.0);
    assert_eq!(s.owner.fee, 0.0);
    assert_eq!(s.payable_amount, 0.0);
}

#[test]
fn serialized_summary_uses_api_field_names() {
    let s = run(&housing_contract(), json!([]));
    let json = serde_json::to_value(&s).unwrap();
    for key in [
        "grossTotal",
        "grossBank",
        "grossOwner",
        "ownerPct",
        "bankPct",
        "totalPct",
        "total",
        "bank",
        "owner",
        "payableAmount",
        "totalVariationsAmount",
        "actualContractorAmount",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    for key in ["fee", "net", "extraFee", "extraFeeWithVat", "extraDescription"] {
        assert!(json["owner"].get(key).is_some(), "missing owner.{key}");
    }
}

#[test]
fn loosely_typed_identifiers_do_not_block_the_summary() {
    let s = run(
        &json!({"id": "12", "project": {"id": 3, "name": "Villa"}, "total_project_value": 1000}),
        json!([]),
    );
    assert_eq!(s.gross_total, 1000.0);
    assert_eq!(s.payable_amount, 1000.0);

    let mut contract = housing_contract();
    contract["id"] = json!("7");
    contract["project"] = json!({"id": 3});
    let variations = json!([
        {"id": "a1b2", "contract": "550e8400-e29b-41d4-a716-446655440000", "net_amount_with_vat": 500}
    ]);
    let loose = run(&contract, variations.clone());
    let strict = run(&housing_contract(), variations);
    assert_eq!(loose, strict);
    assert_eq!(loose.total_variations_amount, 500.0);
}
