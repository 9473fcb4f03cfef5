use finassist::data::{
    conversations::builtin_chat_history, ConversationRegistry, ConversationSource,
    DatasetError, FinancialDataset, RegistryError,
};
use finassist::models::internal::BillStatus;
use finassist::services::Transcript;
use chrono::{TimeZone, Utc};

#[test]
fn test_builtin_registry_order_and_lookup() {
    let registry = ConversationRegistry::builtin().unwrap();
    assert_eq!(registry.len(), 6);

    let ids: Vec<String> = registry.list().into_iter().map(|d| d.id).collect();
    assert_eq!(
        ids,
        vec![
            "month-end-review",
            "audit-prep",
            "cash-flow-crisis",
            "budget-planning",
            "collections-strategy",
            "vendor-negotiation",
        ]
    );

    let convo = registry.get("cash-flow-crisis").unwrap();
    assert_eq!(convo.turns.len(), 6);
    assert!(convo.turns.iter().all(|t| !t.response.is_empty()));
    assert!(registry.get("missing").is_none());
    assert!(registry.get("").is_none());
}

#[test]
fn test_registry_rejects_duplicate_ids() {
    let json = r#"[
        {"id": "dup", "title": "A", "description": "", "icon": "", "category": "",
         "difficulty": "beginner", "duration": "1 min", "turns": []},
        {"id": "dup", "title": "B", "description": "", "icon": "", "category": "",
         "difficulty": "beginner", "duration": "1 min", "turns": []}
    ]"#;

    match ConversationRegistry::from_json(json) {
        Err(RegistryError::DuplicateId(id)) => assert_eq!(id, "dup"),
        other => panic!("expected duplicate id error, got {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_registry_rejects_malformed_json() {
    assert!(matches!(
        ConversationRegistry::from_json("{not json"),
        Err(RegistryError::Parse(_))
    ));
}

#[test]
fn test_builtin_history_seeds_transcript() {
    let history = builtin_chat_history().unwrap();
    assert_eq!(history.len(), 5);
    assert!(history.iter().all(|m| m.is_successful && !m.is_pending()));

    let transcript = Transcript::with_history(history);
    let stats = transcript.stats();
    assert_eq!(stats.total_queries, 5);
    assert_eq!(stats.successful_queries, 5);
    assert!(stats.average_response_time > 0.0);
}

#[test]
fn test_dataset_lookups() {
    let data = FinancialDataset::builtin().unwrap();

    assert_eq!(data.vendor_bills_by_status(BillStatus::Overdue).len(), 2);
    assert_eq!(data.vendor_bills_by_department("IT").len(), 2);
    assert_eq!(data.department_spend("Marketing"), 8_500.0);
    assert_eq!(data.department_spend("Nobody"), 0.0);
    assert_eq!(data.latest_month_expense().unwrap().amount, 720_000.0);
}

#[test]
fn test_overdue_customer_invoices() {
    let data = FinancialDataset::builtin().unwrap();

    let new_year = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let customers: Vec<&str> = data
        .overdue_customer_invoices(new_year)
        .iter()
        .map(|i| i.customer.as_str())
        .collect();
    assert_eq!(customers, vec!["Global Tech Partners", "Retail Chain Solutions"]);

    // Digital Innovation (Jan 20) and Manufacturing Alliance (Jan 30) are behind by February
    let february = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    assert_eq!(data.overdue_customer_invoices(february).len(), 4);
}

#[test]
fn test_payables_and_cash_flow() {
    let data = FinancialDataset::builtin().unwrap();

    assert_eq!(data.total_ap_outstanding(), 86_000.0);
    assert_eq!(data.net_cash_flow(), 990_000.0);

    let latest = data.latest_cash_flow().unwrap();
    assert_eq!(latest.month, "Jun");
    assert_eq!(latest.inflow - latest.outflow, latest.net);
}

#[test]
fn test_empty_dataset_is_safe() {
    let data = FinancialDataset::from_json("{}").unwrap();
    assert_eq!(data.ytd_revenue(), 0.0);
    assert_eq!(data.gross_margin(), 0);
    assert!(data.strongest_revenue_month().is_none());
    assert!(data.high_value_invoices(50_000.0).is_empty());
    assert_eq!(data.net_cash_flow(), 0.0);
    assert!(data.latest_cash_flow().is_none());
}

#[test]
fn test_dataset_rejects_malformed_json() {
    assert!(matches!(
        FinancialDataset::from_json("[1, 2"),
        Err(DatasetError::Parse(_))
    ));
}
