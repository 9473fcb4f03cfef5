pub mod conversations;
pub mod dataset;

pub use conversations::{ConversationRegistry, ConversationSource, RegistryError};
pub use dataset::{DatasetError, FinancialDataset};
