use chrono::NaiveDate;
use std::io::Write;

use crate::currency::format_amount;
use crate::domains::export::csv_record::{csv_amount_to_string, CsvRecord};
use crate::domains::export::types::{ExportError, ExportKind};
use crate::domains::stats::types::{DonationSummaryStats, RangeSummary};

/// UTF-8 BOM so Excel opens the file with the right encoding
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write a BOM, the header row and one row per record. Returns the number of records written.
pub fn write_csv<W: Write, T: CsvRecord>(mut writer: W, records: &[T]) -> Result<usize, ExportError> {
    writer.write_all(UTF8_BOM)?;

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(T::headers())?;
    for record in records {
        wtr.write_record(record.to_csv())?;
    }
    wtr.flush()?;

    log::debug!("Wrote {} CSV record(s)", records.len());
    Ok(records.len())
}

fn write_metric<W: Write>(wtr: &mut csv::Writer<W>, name: &str, value: String) -> Result<(), ExportError> {
    wtr.write_record([name, value.as_str()])?;
    Ok(())
}

/// Metric/value report of the dashboard totals, followed by one row per currency (sorted by code).
pub fn write_summary_report<W: Write>(mut writer: W, stats: &DonationSummaryStats) -> Result<(), ExportError> {
    writer.write_all(UTF8_BOM)?;

    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    wtr.write_record(["metric", "value"])?;
    write_metric(&mut wtr, "total_donations", stats.total_donations.to_string())?;
    write_metric(&mut wtr, "total_amount", csv_amount_to_string(stats.total_amount))?;
    write_metric(&mut wtr, "average_donation", csv_amount_to_string(stats.average_donation))?;
    write_metric(&mut wtr, "total_donors", stats.total_donors.to_string())?;
    write_metric(&mut wtr, "active_donors", stats.active_donors.to_string())?;

    wtr.write_record(["currency", "count", "total", "formatted_total"])?;
    for (code, stat) in stats.currency_breakdown() {
        wtr.write_record([
            code.to_string(),
            stat.count.to_string(),
            csv_amount_to_string(stat.total),
            format_amount(stat.total, code),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Metric/value report for one date range.
pub fn write_range_report<W: Write>(mut writer: W, summary: &RangeSummary) -> Result<(), ExportError> {
    writer.write_all(UTF8_BOM)?;

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(["metric", "value"])?;
    write_metric(&mut wtr, "start_date", summary.start_date.clone())?;
    write_metric(&mut wtr, "end_date", summary.end_date.clone())?;
    write_metric(&mut wtr, "total_donations", summary.total_donations.to_string())?;
    write_metric(&mut wtr, "total_amount", csv_amount_to_string(summary.total_amount))?;
    write_metric(&mut wtr, "unique_donors", summary.unique_donors.to_string())?;
    write_metric(&mut wtr, "average_donation", csv_amount_to_string(summary.average_donation))?;
    wtr.flush()?;
    Ok(())
}

/// `"{kind}-{YYYY-MM-DD}.csv"`
pub fn export_file_name(kind: ExportKind, date: NaiveDate) -> String {
    format!("{}-{}.csv", kind, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::stats::types::{CurrencyStat, MonthlyTrend};
    use std::collections::HashMap;

    fn as_text(bytes: &[u8]) -> &str {
        assert!(bytes.starts_with(UTF8_BOM));
        std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap()
    }

    #[test]
    fn test_write_csv() {
        let trends = vec![
            MonthlyTrend {
                month: "2025-01".to_string(),
                donation_count: 1,
                total_amount: 100.5,
                average_donation: 100.5,
                growth_percent: None,
            },
            MonthlyTrend {
                month: "2025-02".to_string(),
                donation_count: 2,
                total_amount: 50.25,
                average_donation: 25.5,
                growth_percent: Some(-50.0),
            },
        ];

        let mut buffer = Vec::new();
        let written = write_csv(&mut buffer, &trends).unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            as_text(&buffer),
            "month,donation_count,total_amount,average_donation,growth_percent\n\
             2025-01,1,100.50,100.50,\n\
             2025-02,2,50.25,25.50,-50.0\n"
        );
    }

    #[test]
    fn test_write_csv_empty_has_header_only() {
        let mut buffer = Vec::new();
        let written = write_csv::<_, MonthlyTrend>(&mut buffer, &[]).unwrap();
        assert_eq!(written, 0);
        assert_eq!(as_text(&buffer).lines().count(), 1);
    }

    #[test]
    fn test_summary_report_sorts_currencies() {
        let mut currency_stats = HashMap::new();
        currency_stats.insert("ZMW".to_string(), CurrencyStat { count: 2, total: 50.25 });
        currency_stats.insert("USD".to_string(), CurrencyStat { count: 1, total: 100.5 });
        let stats = DonationSummaryStats {
            total_donations: 3,
            total_amount: 150.75,
            total_donors: 2,
            active_donors: 2,
            average_donation: 50.25,
            currency_stats,
        };

        let mut buffer = Vec::new();
        write_summary_report(&mut buffer, &stats).unwrap();
        let text = as_text(&buffer);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "metric,value");
        assert_eq!(lines[2], "total_amount,150.75");
        assert_eq!(lines[6], "currency,count,total,formatted_total");
        assert_eq!(lines[7], "USD,1,100.50,$100.50");
        assert_eq!(lines[8], "ZMW,2,50.25,K50.25");
    }

    #[test]
    fn test_range_report() {
        let summary = RangeSummary {
            start_date: "2025-01-01".to_string(),
            end_date: "2025-01-31".to_string(),
            total_donations: 2,
            total_amount: 30.0,
            unique_donors: 1,
            average_donation: 15.0,
        };
        let mut buffer = Vec::new();
        write_range_report(&mut buffer, &summary).unwrap();
        assert!(as_text(&buffer).contains("unique_donors,1\n"));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(export_file_name(ExportKind::Donations, date), "donations-2025-03-09.csv");
        assert_eq!(export_file_name(ExportKind::Summary, date), "donation-summary-2025-03-09.csv");
    }
}
