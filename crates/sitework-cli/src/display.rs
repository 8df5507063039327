//! Plain-text rendering of summaries and breakdown tables.

use sitework_core::report::BreakdownTable;
use sitework_core::{ContractSummary, Discrepancy, ShareBreakdown};

// ── Public API ──

/// Print the summary as a grouped card.
pub fn print_summary(summary: &ContractSummary) {
    println!("Gross values");
    print_field("total", summary.gross_total);
    print_field("bank", summary.gross_bank);
    print_field("owner", summary.gross_owner);
    println!();

    println!("Consultant percentages");
    print_pct("total (blended)", summary.total_pct);
    print_pct("bank", summary.bank_pct);
    print_pct("owner", summary.owner_pct);
    println!();

    print_share("Total", &summary.total);
    print_share("Bank", &summary.bank);
    print_share("Owner", &summary.owner);

    println!("Totals");
    print_field("variations", summary.total_variations_amount);
    print_field("actual contractor amount", summary.actual_contractor_amount);
    print_field("payable amount", summary.payable_amount);
}

/// Print one breakdown table with VAT columns.
pub fn print_table(table: &BreakdownTable) {
    println!("=== {} ===", table.title);
    println!(
        "  {:<34} {:>16} {:>12} {:>16}",
        "", "amount", "VAT", "incl. VAT"
    );
    for row in &table.rows {
        println!(
            "  {:<34} {:>16} {:>12} {:>16}",
            row.label,
            format_amount(row.amount),
            format_amount(row.vat),
            format_amount(row.amount_with_vat)
        );
    }
    println!();
}

pub fn print_discrepancies(found: &[Discrepancy]) {
    if found.is_empty() {
        println!("Cross-check: all tables reconcile");
        return;
    }
    println!("Cross-check: {} discrepancies", found.len());
    for d in found {
        println!(
            "  {:<30} expected {:>16}  actual {:>16}",
            d.check.to_string(),
            format_amount(d.expected),
            format_amount(d.actual)
        );
    }
}

// ── Helpers ──

fn print_share(header: &str, share: &ShareBreakdown) {
    println!("{header}");
    print_field("fee", share.fee);
    if share.extra_fee > 0.0 {
        print_field("extra fee", share.extra_fee);
        print_field("extra fee incl. VAT", share.extra_fee_with_vat);
        if !share.extra_description.is_empty() {
            println!("  {:<26} {}", "extra fee description", share.extra_description);
        }
    }
    print_field("net", share.net);
    println!();
}

fn print_field(name: &str, amount: f64) {
    println!("  {:<26} {}", name, format_amount(amount));
}

fn print_pct(name: &str, pct: f64) {
    println!("  {:<26} {:.4}%", name, pct);
}

/// Format with thousands separators; fractions only when present.
///
/// `1050000` → `1,050,000`, `350000.5` → `350,000.50`.
pub fn format_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let abs = amount.abs();
    let text = if abs.fract() == 0.0 {
        format!("{abs:.0}")
    } else {
        format!("{abs:.2}")
    };
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(f) = frac_part {
        grouped.push('.');
        grouped.push_str(f);
    }
    if negative && grouped.chars().any(|c| c != '0' && c != ',' && c != '.') {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(1_050_000.0), "1,050,000");
        assert_eq!(format_amount(31_818.0), "31,818");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(0.0), "0");
    }

    #[test]
    fn keeps_two_decimals_for_fractions() {
        assert_eq!(format_amount(350_000.5), "350,000.50");
        assert_eq!(format_amount(1234.567), "1,234.57");
    }

    #[test]
    fn negative_amounts() {
        assert_eq!(format_amount(-10_500.0), "-10,500");
        assert_eq!(format_amount(-5.0), "-5");
    }

    #[test]
    fn tiny_negative_rounds_without_sign() {
        assert_eq!(format_amount(-0.001), "0.00");
    }
}
