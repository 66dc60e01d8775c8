use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standing monthly compensation for one employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollEntry {
    pub employee_id: String,
    pub employee_name: String,
    pub department: String,
    pub base_salary: Decimal,
    pub allowances: Decimal,
    pub deductions: Decimal,
    /// Fraction of gross withheld as tax, e.g. 0.22.
    pub tax_rate: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayrollLine {
    pub employee_id: String,
    pub employee_name: String,
    pub department: String,
    pub gross: Decimal,
    pub tax: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PayrollTotals {
    pub employees: usize,
    pub gross: Decimal,
    pub tax: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollRunStatus {
    Processed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRun {
    pub id: Uuid,
    /// Calendar month, `YYYY-MM`.
    pub period: String,
    pub status: PayrollRunStatus,
    pub lines: Vec<PayrollLine>,
    pub totals: PayrollTotals,
    pub processed_at: DateTime<Utc>,
}
