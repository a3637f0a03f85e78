//! Database access shared by the SwimResults services

pub mod init;

pub use init::{connect_in_memory, create_tables, init_database, ping, BUSY_TIMEOUT};
