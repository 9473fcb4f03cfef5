use chrono::{DateTime, TimeZone, Utc};
use finassist::data::FinancialDataset;
use finassist::orchestrator::intent_resolver::FALLBACK_RESPONSE;
use finassist::orchestrator::{Intent, IntentResolver};
use serde_json::json;
use std::sync::Arc;

/// Midnight UTC at the start of the given day.
fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn builtin_resolver() -> IntentResolver {
    IntentResolver::new(Arc::new(FinancialDataset::builtin().unwrap()))
}

fn bill(vendor: &str, amount: u32, status: &str, due_date: &str) -> serde_json::Value {
    json!({
        "id": format!("VB-{}", vendor),
        "vendor": vendor,
        "bill_number": "INV-1",
        "amount": amount,
        "currency": "USD",
        "status": status,
        "due_date": due_date,
        "department": "Operations",
        "subsidiary": "US"
    })
}

fn resolver_with_bills(bills: Vec<serde_json::Value>) -> IntentResolver {
    let data = json!({ "vendor_bills": bills }).to_string();
    IntentResolver::new(Arc::new(FinancialDataset::from_json(&data).unwrap()))
}

// ============================================
// Rule 1: overdue vendor bills
// ============================================

#[test]
fn test_overdue_bills_listing() {
    let resolver = resolver_with_bills(vec![
        bill("Vendor A", 8500, "overdue", "2024-01-10"),
        bill("Vendor B", 18000, "overdue", "2024-01-15"),
        bill("Vendor C", 3000, "pending", "2024-03-01"),
    ]);

    let resolution = resolver.resolve_on("Show me overdue vendor bills", date(2024, 1, 1));
    assert_eq!(resolution.intent, Intent::OverdueVendorBills);
    assert_eq!(
        resolution.response,
        "I found 2 overdue vendor bills totaling $26,500: Vendor A ($8,500), \
         Vendor B ($18,000). These require immediate attention for cash flow management."
    );
}

#[test]
fn test_overdue_bills_include_past_due_dates() {
    let resolver = resolver_with_bills(vec![
        bill("Vendor A", 8500, "overdue", "2024-01-10"),
        bill("Vendor C", 3000, "pending", "2024-03-01"),
    ]);

    let resolution = resolver.resolve_on("overdue vendor list", date(2024, 3, 2));
    assert!(resolution.response.starts_with("I found 2 overdue vendor bills totaling $11,500"));
    assert!(resolution.response.contains("Vendor C ($3,000)"));
}

#[test]
fn test_bill_due_today_is_past_due() {
    let resolver = resolver_with_bills(vec![bill("Vendor D", 4000, "pending", "2024-01-20")]);

    let morning = Utc.with_ymd_and_hms(2024, 1, 20, 9, 30, 0).unwrap();
    let resolution = resolver.resolve_on("overdue vendor bills", morning);
    assert_eq!(
        resolution.response,
        "I found 1 overdue vendor bills totaling $4,000: Vendor D ($4,000). \
         These require immediate attention for cash flow management."
    );

    // Not yet at the exact start of the due day
    let resolution = resolver.resolve_on("overdue vendor bills", date(2024, 1, 20));
    assert!(resolution.response.starts_with("I found no overdue vendor bills"));
}

#[test]
fn test_no_overdue_bills() {
    let resolver = resolver_with_bills(vec![bill("Vendor C", 3000, "pending", "2024-03-01")]);

    let resolution = resolver.resolve_on("any overdue vendor payments?", date(2024, 1, 1));
    assert_eq!(resolution.intent, Intent::OverdueVendorBills);
    assert_eq!(
        resolution.response,
        "I found no overdue vendor bills. All vendor payments are current."
    );
}

#[test]
fn test_overdue_bills_against_builtin_data() {
    let resolution = builtin_resolver().resolve_on("overdue vendor bills", date(2024, 1, 1));
    assert_eq!(
        resolution.response,
        "I found 2 overdue vendor bills totaling $26,500: Global Marketing Services ($8,500), \
         European Logistics ($18,000). These require immediate attention for cash flow management."
    );
}

// ============================================
// Rules 2-7 against the builtin dataset
// ============================================

#[test]
fn test_high_value_invoices() {
    let resolution = builtin_resolver().resolve("List invoices over 50k");
    assert_eq!(resolution.intent, Intent::HighValueInvoices);
    assert_eq!(
        resolution.response,
        "I found 6 customer invoices over $50k: Enterprise Solutions Inc ($85,000), \
         Global Tech Partners ($62,000), Healthcare Systems Ltd ($120,000), \
         Financial Services Group ($95,000), Manufacturing Alliance ($78,000), \
         Education Technology ($52,000). Total value: $492,000."
    );
}

#[test]
fn test_high_value_threshold_is_configurable() {
    let resolver = builtin_resolver().with_high_value_threshold(90_000.0);
    let resolution = resolver.resolve("invoices above 50000");
    assert!(resolution.response.starts_with("I found 2 customer invoices over $90k"));
    assert!(resolution.response.ends_with("Total value: $215,000."));
}

#[test]
fn test_balance_sheet() {
    let resolution = builtin_resolver().resolve("What does the balance sheet look like?");
    assert_eq!(resolution.intent, Intent::BalanceSheet);
    assert_eq!(
        resolution.response,
        "Current balance sheet summary: Total Assets: $3.9M, Total Liabilities: $1.6M, \
         Total Equity: $2.3M. Cash position: $850K. Current ratio: 3.67."
    );
}

#[test]
fn test_income_statement() {
    let resolution = builtin_resolver().resolve("How is revenue trending?");
    assert_eq!(resolution.intent, Intent::IncomeStatement);
    assert_eq!(
        resolution.response,
        "Year-to-date revenue: $8.69M. Net income: $2.34M. Gross margin: 27%. \
         December was strongest at $985K."
    );
}

#[test]
fn test_receivables_aging() {
    let resolution = builtin_resolver().resolve("Show me the AR aging report");
    assert_eq!(resolution.intent, Intent::ReceivablesAging);
    assert_eq!(
        resolution.response,
        "A/R Aging Summary: Current: $352K (71%), Overdue: $144K (29%). \
         Total outstanding: $496K. Priority collections needed for accounts over 60 days."
    );
}

#[test]
fn test_cash_flow() {
    let resolution = builtin_resolver().resolve("cash flow update");
    assert_eq!(resolution.intent, Intent::CashFlow);
    assert_eq!(
        resolution.response,
        "Current cash position: $850K. Monthly burn rate: $720K. Cash runway: 1.2 months. \
         Accounts receivable: $456K available for collection."
    );
}

#[test]
fn test_department_spend() {
    let resolution = builtin_resolver().resolve("Break down spend by department");
    assert_eq!(resolution.intent, Intent::DepartmentSpend);
    assert_eq!(
        resolution.response,
        "Department spending analysis: IT: $27K (29%), Marketing: $9K (9%), \
         Operations and other departments make up the remainder. Total vendor bills: $92K."
    );
}

#[test]
fn test_fallback() {
    let resolution = builtin_resolver().resolve("Tell me a joke");
    assert_eq!(resolution.intent, Intent::General);
    assert_eq!(resolution.response, FALLBACK_RESPONSE);
    assert_eq!(resolution.intent.query_type(), "general");
}

// ============================================
// Matching behaviour
// ============================================

#[test]
fn test_first_matching_rule_wins() {
    let resolver = resolver_with_bills(vec![bill("Vendor A", 8500, "overdue", "2024-01-10")]);

    // Mentions both vendor bills and cash flow; the bills rule is checked first
    let resolution = resolver.resolve_on(
        "overdue vendor bills and their cash flow impact",
        date(2024, 1, 1),
    );
    assert_eq!(resolution.intent, Intent::OverdueVendorBills);

    assert_eq!(
        IntentResolver::classify("balance sheet vs revenue"),
        Intent::BalanceSheet
    );
    assert_eq!(
        IntentResolver::classify("receivables and cash flow"),
        Intent::ReceivablesAging
    );
}

#[test]
fn test_matching_is_case_insensitive() {
    assert_eq!(IntentResolver::classify("BALANCE SHEET"), Intent::BalanceSheet);
    assert_eq!(IntentResolver::classify("Cash Position"), Intent::CashFlow);
    assert_eq!(
        IntentResolver::classify("OVERDUE VENDOR"),
        Intent::OverdueVendorBills
    );
}

#[test]
fn test_high_value_rule_needs_both_terms() {
    assert_eq!(IntentResolver::classify("show invoices"), Intent::General);
    assert_eq!(IntentResolver::classify("anything over 50k?"), Intent::General);
    assert_eq!(
        IntentResolver::classify("invoice totals above 50000"),
        Intent::HighValueInvoices
    );
}

#[test]
fn test_substring_matching_without_word_boundaries() {
    // "outcome" does not contain "income", but "incomes" does
    assert_eq!(IntentResolver::classify("incomes"), Intent::IncomeStatement);
    assert_eq!(IntentResolver::classify("reassets"), Intent::BalanceSheet);
}

#[test]
fn test_resolution_is_deterministic() {
    let resolver = builtin_resolver();
    let today = date(2024, 2, 1);
    for query in [
        "overdue vendor bills",
        "invoices over 50k",
        "balance sheet",
        "revenue",
        "aging",
        "cash flow",
        "department",
        "hello",
    ] {
        assert_eq!(
            resolver.resolve_on(query, today),
            resolver.resolve_on(query, today)
        );
    }
}
