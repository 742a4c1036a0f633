pub mod data_records;
pub mod device_logs;
pub mod relay_status;
pub mod users;
