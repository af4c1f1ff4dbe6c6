//! Income and expense transactions: the domain model, database operations,
//! and the `/api/transactions` handlers.

mod db;
mod endpoints;
mod models;

pub use db::{
    TransactionQuery, TransactionUpdate, create_transaction, create_transaction_table,
    delete_transaction, get_transaction, get_transactions, update_transaction,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
    get_transactions_endpoint, update_transaction_endpoint,
};
pub use models::{Transaction, TransactionBuilder, TransactionType};
