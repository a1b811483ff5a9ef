mod user_create_email_idx;
mod user_create_table;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "keycard",
    "m0_1",
    vec_box![],
    vec_box![user_create_table::Operation, user_create_email_idx::Operation]
);
