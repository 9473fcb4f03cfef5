use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::dataset::{month_name, FinancialDataset};
use crate::orchestrator::formatting::{fixed, grouped, millions, percent_of, ratio, thousands};

pub const DEFAULT_HIGH_VALUE_THRESHOLD: f64 = 50_000.0;

/// Departments called out by name in the spending breakdown.
pub const HIGHLIGHTED_DEPARTMENTS: [&str; 2] = ["IT", "Marketing"];

pub const FALLBACK_RESPONSE: &str = "I understand you're asking about financial data. \
I can help with vendor bills, customer invoices, aging reports, income statements, \
balance sheets, and more. Could you please be more specific about what information you need?";

/// What a query was resolved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    OverdueVendorBills,
    HighValueInvoices,
    BalanceSheet,
    IncomeStatement,
    ReceivablesAging,
    CashFlow,
    DepartmentSpend,
    General,
}

/// Rules in priority order; the first match wins.
const RULES: [Intent; 7] = [
    Intent::OverdueVendorBills,
    Intent::HighValueInvoices,
    Intent::BalanceSheet,
    Intent::IncomeStatement,
    Intent::ReceivablesAging,
    Intent::CashFlow,
    Intent::DepartmentSpend,
];

impl Intent {
    /// Label stored on the answered message.
    pub fn query_type(self) -> &'static str {
        match self {
            Intent::OverdueVendorBills => "vendor_bills",
            Intent::HighValueInvoices => "customer_invoices",
            Intent::BalanceSheet => "balance_sheet",
            Intent::IncomeStatement => "income_statement",
            Intent::ReceivablesAging => "ar_aging",
            Intent::CashFlow => "cash_flow",
            Intent::DepartmentSpend => "department_spend",
            Intent::General => "general",
        }
    }

    /// Raw substring tests against an already lower-cased query.
    fn matches(self, query: &str) -> bool {
        match self {
            Intent::OverdueVendorBills => query.contains("overdue") && query.contains("vendor"),
            Intent::HighValueInvoices => {
                query.contains("invoice") && (query.contains("50k") || query.contains("50000"))
            }
            Intent::BalanceSheet => query.contains("balance sheet") || query.contains("assets"),
            Intent::IncomeStatement => query.contains("income") || query.contains("revenue"),
            Intent::ReceivablesAging => query.contains("aging") || query.contains("receivables"),
            Intent::CashFlow => query.contains("cash flow") || query.contains("cash position"),
            Intent::DepartmentSpend => {
                query.contains("department") || query.contains("cost center")
            }
            Intent::General => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub intent: Intent,
    pub response: String,
}

/// Maps free-text questions to canned answers computed over the dataset.
///
/// Matching is case-insensitive substring search with no word boundaries,
/// so "managing" matches the aging rule.
#[derive(Debug, Clone)]
pub struct IntentResolver {
    dataset: Arc<FinancialDataset>,
    high_value_threshold: f64,
}

impl IntentResolver {
    pub fn new(dataset: Arc<FinancialDataset>) -> Self {
        Self {
            dataset,
            high_value_threshold: DEFAULT_HIGH_VALUE_THRESHOLD,
        }
    }

    pub fn with_high_value_threshold(mut self, threshold: f64) -> Self {
        self.high_value_threshold = threshold;
        self
    }

    pub fn dataset(&self) -> &FinancialDataset {
        &self.dataset
    }

    pub fn classify(query: &str) -> Intent {
        let query = query.to_lowercase();
        RULES
            .iter()
            .copied()
            .find(|intent| intent.matches(&query))
            .unwrap_or(Intent::General)
    }

    /// Resolve against the current time.
    pub fn resolve(&self, query: &str) -> Resolution {
        self.resolve_on(query, Utc::now())
    }

    /// Resolve with `now` as the cut-off for past-due bills.
    pub fn resolve_on(&self, query: &str, now: DateTime<Utc>) -> Resolution {
        let intent = Self::classify(query);
        let response = match intent {
            Intent::OverdueVendorBills => self.overdue_vendor_bills(now),
            Intent::HighValueInvoices => self.high_value_invoices(),
            Intent::BalanceSheet => self.balance_sheet(),
            Intent::IncomeStatement => self.income_statement(),
            Intent::ReceivablesAging => self.receivables_aging(),
            Intent::CashFlow => self.cash_flow(),
            Intent::DepartmentSpend => self.department_spend(),
            Intent::General => FALLBACK_RESPONSE.to_string(),
        };
        Resolution { intent, response }
    }

    fn overdue_vendor_bills(&self, now: DateTime<Utc>) -> String {
        let bills = self.dataset.overdue_vendor_bills(now);
        if bills.is_empty() {
            return "I found no overdue vendor bills. All vendor payments are current.".to_string();
        }

        let total: f64 = bills.iter().map(|b| b.amount).sum();
        let listing = bills
            .iter()
            .map(|b| format!("{} (${})", b.vendor, grouped(b.amount)))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "I found {} overdue vendor bills totaling ${}: {}. \
             These require immediate attention for cash flow management.",
            bills.len(),
            grouped(total),
            listing
        )
    }

    fn high_value_invoices(&self) -> String {
        let invoices = self.dataset.high_value_invoices(self.high_value_threshold);
        let total: f64 = invoices.iter().map(|i| i.amount).sum();
        let listing = invoices
            .iter()
            .map(|i| format!("{} (${})", i.customer, grouped(i.amount)))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "I found {} customer invoices over ${}k: {}. Total value: ${}.",
            invoices.len(),
            thousands(self.high_value_threshold, 0),
            listing,
            grouped(total)
        )
    }

    fn balance_sheet(&self) -> String {
        let sheet = self.dataset.balance_sheet();
        format!(
            "Current balance sheet summary: Total Assets: ${}M, Total Liabilities: ${}M, \
             Total Equity: ${}M. Cash position: ${}K. Current ratio: {}.",
            millions(sheet.assets.total_assets, 1),
            millions(sheet.liabilities.total_liabilities, 1),
            millions(sheet.equity.total_equity, 1),
            thousands(sheet.assets.cash, 0),
            fixed(
                ratio(
                    sheet.assets.current_assets,
                    sheet.liabilities.current_liabilities
                ),
                2
            )
        )
    }

    fn income_statement(&self) -> String {
        let mut text = format!(
            "Year-to-date revenue: ${}M. Net income: ${}M. Gross margin: {}%.",
            millions(self.dataset.ytd_revenue(), 2),
            millions(self.dataset.net_income(), 2),
            self.dataset.gross_margin()
        );
        if let Some(best) = self.dataset.strongest_revenue_month() {
            text.push_str(&format!(
                " {} was strongest at ${}K.",
                month_name(&best.month),
                thousands(best.amount, 0)
            ));
        }
        text
    }

    fn receivables_aging(&self) -> String {
        let total = self.dataset.total_ar_outstanding();
        let current = self.dataset.current_ar();
        let overdue = self.dataset.overdue_ar();

        format!(
            "A/R Aging Summary: Current: ${}K ({}%), Overdue: ${}K ({}%). \
             Total outstanding: ${}K. Priority collections needed for accounts over 60 days.",
            thousands(current, 0),
            percent_of(current, total),
            thousands(overdue, 0),
            percent_of(overdue, total),
            thousands(total, 0)
        )
    }

    fn cash_flow(&self) -> String {
        let assets = &self.dataset.balance_sheet().assets;
        let burn_rate = self
            .dataset
            .latest_month_expense()
            .map(|m| m.amount)
            .unwrap_or_default();

        format!(
            "Current cash position: ${}K. Monthly burn rate: ${}K. Cash runway: {} months. \
             Accounts receivable: ${}K available for collection.",
            thousands(assets.cash, 0),
            thousands(burn_rate, 0),
            fixed(ratio(assets.cash, burn_rate), 1),
            thousands(assets.accounts_receivable, 0)
        )
    }

    fn department_spend(&self) -> String {
        let total = self.dataset.total_vendor_spend();
        let breakdown = HIGHLIGHTED_DEPARTMENTS
            .iter()
            .map(|dept| {
                let spend = self.dataset.department_spend(dept);
                format!(
                    "{}: ${}K ({}%)",
                    dept,
                    thousands(spend, 0),
                    percent_of(spend, total)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Department spending analysis: {}, Operations and other departments make up \
             the remainder. Total vendor bills: ${}K.",
            breakdown,
            thousands(total, 0)
        )
    }
}
