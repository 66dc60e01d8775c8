use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::payroll::models::{
    PayrollEntry, PayrollLine, PayrollRun, PayrollRunStatus, PayrollTotals,
};

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a payroll period and returns it in canonical `YYYY-MM` form, so
/// `2026-1` and `2026-01` name the same month.
pub fn normalize_period(period: &str) -> Result<String, String> {
    let period = period.trim();
    NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m").to_string())
        .map_err(|_| format!("Invalid payroll period '{period}', expected YYYY-MM"))
}

/// gross = base + allowances; tax = gross × rate; net = gross − tax − deductions.
pub fn compute_line(entry: &PayrollEntry) -> PayrollLine {
    let gross = round_money(entry.base_salary + entry.allowances);
    let tax = round_money(gross * entry.tax_rate);
    let net = gross - tax - entry.deductions;
    PayrollLine {
        employee_id: entry.employee_id.clone(),
        employee_name: entry.employee_name.clone(),
        department: entry.department.clone(),
        gross,
        tax,
        deductions: entry.deductions,
        net,
    }
}

pub fn compute_totals(lines: &[PayrollLine]) -> PayrollTotals {
    lines.iter().fold(
        PayrollTotals {
            employees: lines.len(),
            ..PayrollTotals::default()
        },
        |mut acc, line| {
            acc.gross += line.gross;
            acc.tax += line.tax;
            acc.deductions += line.deductions;
            acc.net += line.net;
            acc
        },
    )
}

pub fn build_run(period: &str, entries: &[PayrollEntry]) -> PayrollRun {
    let lines: Vec<PayrollLine> = entries.iter().map(compute_line).collect();
    let totals = compute_totals(&lines);
    PayrollRun {
        id: Uuid::new_v4(),
        period: period.to_string(),
        status: PayrollRunStatus::Processed,
        lines,
        totals,
        processed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(id: &str, base: Decimal, allow: Decimal, ded: Decimal, rate: Decimal) -> PayrollEntry {
        PayrollEntry {
            employee_id: id.to_string(),
            employee_name: format!("Employee {id}"),
            department: "Engineering".to_string(),
            base_salary: base,
            allowances: allow,
            deductions: ded,
            tax_rate: rate,
        }
    }

    #[test]
    fn test_compute_line() {
        let line = compute_line(&entry("E1", dec!(5000), dec!(500), dec!(200), dec!(0.2)));
        assert_eq!(line.gross, dec!(5500));
        assert_eq!(line.tax, dec!(1100.00));
        assert_eq!(line.net, dec!(4200.00));
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        let line = compute_line(&entry("E1", dec!(3333.33), dec!(0), dec!(0), dec!(0.215)));
        assert_eq!(line.tax, dec!(716.67));
    }

    #[test]
    fn test_totals_sum_lines() {
        let run = build_run(
            "2026-09",
            &[
                entry("E1", dec!(5000), dec!(500), dec!(200), dec!(0.2)),
                entry("E2", dec!(4000), dec!(0), dec!(100), dec!(0.1)),
            ],
        );
        assert_eq!(run.totals.employees, 2);
        assert_eq!(run.totals.gross, dec!(9500));
        assert_eq!(run.totals.net, run.lines[0].net + run.lines[1].net);
        assert_eq!(run.status, PayrollRunStatus::Processed);
    }

    #[test]
    fn test_empty_run_has_zero_totals() {
        let run = build_run("2026-09", &[]);
        assert_eq!(run.totals.employees, 0);
        assert_eq!(run.totals.net, Decimal::ZERO);
    }

    #[test]
    fn test_normalize_period() {
        assert_eq!(normalize_period("2026-10").unwrap(), "2026-10");
        assert_eq!(normalize_period("2026-1").unwrap(), "2026-01");
        assert_eq!(normalize_period(" 2026-03 ").unwrap(), "2026-03");
        assert!(normalize_period("2026-13").is_err());
        assert!(normalize_period("October").is_err());
    }
}
