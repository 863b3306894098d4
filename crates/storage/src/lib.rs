pub mod db;

pub use db::{
    create_db, create_memory_db, delete_payment, find_payment_by_hash, get_all_payments,
    get_payment_by_id, insert_payment, DbPool, PaymentRecord,
};
