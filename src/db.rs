//! Database schema initialization for the application.

use rusqlite::Connection;

use crate::{Error, budget, transaction, user};

/// Create the tables for the domain models if they do not exist.
///
/// Also enables foreign key enforcement so that deleting a user cascades to
/// their transactions and budgets.
///
/// # Errors
/// Returns an error if the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let sql_transaction = connection.unchecked_transaction()?;

    user::create_user_table(&sql_transaction)?;
    transaction::create_transaction_table(&sql_transaction)?;
    budget::create_budget_table(&sql_transaction)?;

    sql_transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        let count: i64 = connection
            .query_row(
                "SELECT COUNT(name) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('user', 'transaction', 'budget')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(count, 3, "want 3 tables, got {count}");
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Second initialization failed");
    }

    #[test]
    fn deleting_a_user_cascades_to_owned_rows() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let user =
            crate::user::upsert_user("idp|123", "Alice", "alice@example.com", &connection).unwrap();
        connection
            .execute(
                "INSERT INTO \"transaction\" (user_id, title, amount, type, category, date)
                 VALUES (?1, 'Groceries', 50.0, 'expense', 'food', '2024-03-10')",
                [user.id],
            )
            .unwrap();
        connection
            .execute(
                "INSERT INTO budget (user_id, category, monthly_limit, month, year)
                 VALUES (?1, 'food', 100.0, 3, 2024)",
                [user.id],
            )
            .unwrap();

        crate::user::delete_user_by_subject("idp|123", &connection).unwrap();

        let transactions: i64 = connection
            .query_row("SELECT COUNT(id) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap();
        let budgets: i64 = connection
            .query_row("SELECT COUNT(id) FROM budget", [], |row| row.get(0))
            .unwrap();
        assert_eq!(transactions, 0, "want transactions removed with their owner");
        assert_eq!(budgets, 0, "want budgets removed with their owner");
    }
}
