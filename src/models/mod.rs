//! Data models for the inventory server

pub mod category;
pub mod item;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use category::Category;
pub use item::Item;
pub use loan::{Loan, LoanStatus};
pub use user::{Role, User};
