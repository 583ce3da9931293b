pub mod types;
pub mod csv_record;
pub mod writer;
pub mod receipt;

pub use types::{ExportError, ExportKind};
pub use csv_record::CsvRecord;
pub use writer::{export_file_name, write_csv, write_range_report, write_summary_report};
pub use receipt::{receipt_file_name, ApiReceiptService, OrganizationInfo, ReceiptRequest, ReceiptService};
