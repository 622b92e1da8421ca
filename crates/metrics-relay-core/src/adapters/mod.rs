//! # Infrastructure Adapters
//!
//! Infrastructure implementations of the report delivery interface.

pub mod http_report_sender;

pub use http_report_sender::HttpReportSender;
