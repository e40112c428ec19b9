pub mod ble;
pub mod classify;
pub mod constants;
pub mod features;
pub mod permission;
pub mod scanner;
pub mod types;
