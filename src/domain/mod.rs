pub mod category;
pub mod common;
pub mod transaction;

pub use category::{Category, CategoryDraft};
pub use common::{Displayable, Identifiable, Record};
pub use transaction::{Transaction, TransactionDraft, TransactionKind};
