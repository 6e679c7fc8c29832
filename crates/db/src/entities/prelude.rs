//! Entity re-exports.

pub use super::books::Entity as Books;
pub use super::students::Entity as Students;
pub use super::transactions::Entity as Transactions;
