pub mod transaction;

pub use transaction::{
    RawTransaction, Transaction, INTERNAL_TRANSFER_SUBCATEGORIES, NO_SUBCATEGORY,
    SAVINGS_CATEGORIES, SAVINGS_CATEGORY,
};
