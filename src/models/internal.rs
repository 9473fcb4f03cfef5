use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Query type carried by a live turn until its response lands.
pub const PENDING_QUERY_TYPE: &str = "general";

/// One turn of conversation: the user's utterance and the assistant's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub message: String,
    /// Empty while the response is pending.
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub query_type: String,
    pub processing_time: f64,
    pub is_successful: bool,
}

impl ChatMessage {
    /// New turn with no response yet, stamped now.
    pub fn pending(id: impl Into<String>, user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            message: message.into(),
            response: String::new(),
            timestamp: Utc::now(),
            query_type: PENDING_QUERY_TYPE.to_string(),
            processing_time: 0.0,
            is_successful: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.response.is_empty()
    }
}

/// A prewritten message and its canned response inside a demo conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoTurn {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub query_type: String,
    pub processing_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConversation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub difficulty: String,
    pub duration: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub turns: Vec<DemoTurn>,
}

impl DemoConversation {
    pub fn summary(&self) -> DemoConversationSummary {
        DemoConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty.clone(),
            duration: self.duration.clone(),
            tags: self.tags.clone(),
            turn_count: self.turns.len(),
        }
    }
}

/// Display metadata of a demo conversation without its turns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoConversationSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub difficulty: String,
    pub duration: String,
    pub tags: Vec<String>,
    pub turn_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Pending,
    Approved,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorBill {
    pub id: String,
    pub vendor: String,
    pub bill_number: String,
    pub amount: f64,
    pub currency: String,
    pub status: BillStatus,
    pub due_date: NaiveDate,
    pub department: String,
    pub subsidiary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInvoice {
    pub id: String,
    pub customer: String,
    pub invoice_number: String,
    pub amount: f64,
    pub currency: String,
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    pub terms: String,
    pub subsidiary: String,
}

/// Aging buckets for one counterparty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeingRow {
    pub customer: String,
    pub current: f64,
    pub days30: f64,
    pub days60: f64,
    pub days90: f64,
    pub over90: f64,
    pub total: f64,
}

impl AgeingRow {
    pub fn overdue(&self) -> f64 {
        self.days30 + self.days60 + self.days90 + self.over90
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAmount {
    /// Three-letter month abbreviation ("Jan" .. "Dec").
    pub month: String,
    pub amount: f64,
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub revenue: Vec<MonthlyAmount>,
    pub expenses: Vec<MonthlyAmount>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Assets {
    pub cash: f64,
    pub accounts_receivable: f64,
    pub inventory: f64,
    pub current_assets: f64,
    pub fixed_assets: f64,
    pub total_assets: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Liabilities {
    pub accounts_payable: f64,
    pub accruals: f64,
    pub current_liabilities: f64,
    pub long_term_debt: f64,
    pub total_liabilities: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Equity {
    pub paid_in_capital: f64,
    pub retained_earnings: f64,
    pub total_equity: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub assets: Assets,
    pub liabilities: Liabilities,
    pub equity: Equity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowMonth {
    pub month: String,
    pub inflow: f64,
    pub outflow: f64,
    pub net: f64,
}

/// Aggregates over a transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryStats {
    pub total_queries: usize,
    pub successful_queries: usize,
    pub average_response_time: f64,
    pub top_query_types: Vec<QueryTypeCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryTypeCount {
    pub query_type: String,
    pub count: usize,
}
