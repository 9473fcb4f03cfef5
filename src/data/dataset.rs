use chrono::{DateTime, Month, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::models::internal::{
    AgeingRow, BalanceSheet, BillStatus, CashFlowMonth, CustomerInvoice, IncomeStatement,
    InvoiceStatus, MonthlyAmount, VendorBill,
};

const BUILTIN_DATASET: &str = include_str!("financial_dataset.json");

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to parse financial dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Static, read-only financial data the assistant answers from.
///
/// Every accessor is a pure getter over the in-memory tables; nothing here
/// mutates after construction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinancialDataset {
    #[serde(default)]
    pub vendor_bills: Vec<VendorBill>,
    #[serde(default)]
    pub customer_invoices: Vec<CustomerInvoice>,
    #[serde(default)]
    pub ar_ageing: Vec<AgeingRow>,
    #[serde(default)]
    pub ap_ageing: Vec<AgeingRow>,
    #[serde(default)]
    pub income_statement: IncomeStatement,
    #[serde(default)]
    pub balance_sheet: BalanceSheet,
    #[serde(default)]
    pub cash_flow: Vec<CashFlowMonth>,
}

impl FinancialDataset {
    /// The demo company's books, embedded at build time.
    pub fn builtin() -> Result<Self, DatasetError> {
        Self::from_json(BUILTIN_DATASET)
    }

    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    // ==================== VENDOR BILLS ====================

    pub fn vendor_bills_by_status(&self, status: BillStatus) -> Vec<&VendorBill> {
        self.vendor_bills
            .iter()
            .filter(|bill| bill.status == status)
            .collect()
    }

    pub fn vendor_bills_by_department(&self, department: &str) -> Vec<&VendorBill> {
        self.vendor_bills
            .iter()
            .filter(|bill| bill.department == department)
            .collect()
    }

    /// Bills flagged overdue, or whose due date began before `now`.
    ///
    /// A due date stands for midnight UTC, so a bill is past due from the
    /// first instant after the start of its due day.
    pub fn overdue_vendor_bills(&self, now: DateTime<Utc>) -> Vec<&VendorBill> {
        self.vendor_bills
            .iter()
            .filter(|bill| bill.status == BillStatus::Overdue || due_before(bill.due_date, now))
            .collect()
    }

    pub fn department_spend(&self, department: &str) -> f64 {
        self.vendor_bills_by_department(department)
            .iter()
            .map(|bill| bill.amount)
            .sum()
    }

    pub fn total_vendor_spend(&self) -> f64 {
        self.vendor_bills.iter().map(|bill| bill.amount).sum()
    }

    // ==================== CUSTOMER INVOICES ====================

    /// Invoices strictly above `threshold`.
    pub fn high_value_invoices(&self, threshold: f64) -> Vec<&CustomerInvoice> {
        self.customer_invoices
            .iter()
            .filter(|invoice| invoice.amount > threshold)
            .collect()
    }

    /// Same cut-off as [`Self::overdue_vendor_bills`].
    pub fn overdue_customer_invoices(&self, now: DateTime<Utc>) -> Vec<&CustomerInvoice> {
        self.customer_invoices
            .iter()
            .filter(|invoice| {
                invoice.status == InvoiceStatus::Overdue || due_before(invoice.due_date, now)
            })
            .collect()
    }

    // ==================== AGING ====================

    pub fn total_ar_outstanding(&self) -> f64 {
        self.ar_ageing.iter().map(|row| row.total).sum()
    }

    pub fn current_ar(&self) -> f64 {
        self.ar_ageing.iter().map(|row| row.current).sum()
    }

    pub fn overdue_ar(&self) -> f64 {
        self.ar_ageing.iter().map(AgeingRow::overdue).sum()
    }

    pub fn total_ap_outstanding(&self) -> f64 {
        self.ap_ageing.iter().map(|row| row.total).sum()
    }

    // ==================== CASH FLOW ====================

    /// Sum of monthly net cash flow on record.
    pub fn net_cash_flow(&self) -> f64 {
        self.cash_flow.iter().map(|m| m.net).sum()
    }

    pub fn latest_cash_flow(&self) -> Option<&CashFlowMonth> {
        self.cash_flow.last()
    }

    // ==================== INCOME STATEMENT ====================

    pub fn ytd_revenue(&self) -> f64 {
        self.income_statement.revenue.iter().map(|m| m.amount).sum()
    }

    pub fn ytd_expenses(&self) -> f64 {
        self.income_statement.expenses.iter().map(|m| m.amount).sum()
    }

    pub fn net_income(&self) -> f64 {
        self.ytd_revenue() - self.ytd_expenses()
    }

    /// Net income over revenue as a whole percentage, 0 without revenue.
    pub fn gross_margin(&self) -> i64 {
        crate::orchestrator::formatting::percent_of(self.net_income(), self.ytd_revenue())
    }

    /// Highest-revenue month; the earliest one wins a tie.
    pub fn strongest_revenue_month(&self) -> Option<&MonthlyAmount> {
        self.income_statement
            .revenue
            .iter()
            .fold(None, |best: Option<&MonthlyAmount>, month| match best {
                Some(b) if b.amount >= month.amount => Some(b),
                _ => Some(month),
            })
    }

    /// Expense of the most recent month on record.
    pub fn latest_month_expense(&self) -> Option<&MonthlyAmount> {
        self.income_statement.expenses.last()
    }

    pub fn balance_sheet(&self) -> &BalanceSheet {
        &self.balance_sheet
    }
}

fn due_before(due_date: NaiveDate, now: DateTime<Utc>) -> bool {
    due_date.and_time(NaiveTime::MIN).and_utc() < now
}

/// "Dec" -> "December"; unknown abbreviations are returned unchanged.
pub fn month_name(abbreviation: &str) -> String {
    abbreviation
        .parse::<Month>()
        .map(|m| m.name().to_string())
        .unwrap_or_else(|_| abbreviation.to_string())
}
