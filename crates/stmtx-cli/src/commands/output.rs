//! Rendering of extraction results as JSON, CSV or plain text.

use std::path::{Path, PathBuf};

use serde_json::json;

use stmtx_core::{
    format_inr, AccountInfo, AnalysisReport, StatementExtraction, TransactionTable,
    TRANSACTION_COLUMNS,
};

/// Flag columns appended to CSV output when flagging is enabled.
const FLAG_COLUMNS: [&str; 3] = ["is_large_dd", "is_large_rtgs", "is_suspicious_entity"];

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (transactions table)
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Render an extraction, with flags when a report is given.
pub fn format_extraction(
    extraction: &StatementExtraction,
    report: Option<&AnalysisReport>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(extraction, report),
        OutputFormat::Csv => format_transactions_csv(&extraction.transactions, report),
        OutputFormat::Text => Ok(format_text(extraction, report)),
    }
}

fn format_json(
    extraction: &StatementExtraction,
    report: Option<&AnalysisReport>,
) -> anyhow::Result<String> {
    let transactions = match report {
        Some(report) => serde_json::to_value(&report.transactions)?,
        None => serde_json::to_value(&extraction.transactions)?,
    };

    let mut output = json!({
        "issuer": extraction.issuer,
        "account_info": extraction.account.info,
        "transactions": transactions,
        "warnings": extraction.warnings,
    });

    if let Some(report) = report {
        output["summary"] = serde_json::to_value(&report.summary)?;
    }

    Ok(serde_json::to_string_pretty(&output)?)
}

/// Transactions as CSV with the fixed column names.
pub fn format_transactions_csv(
    table: &TransactionTable,
    report: Option<&AnalysisReport>,
) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = TRANSACTION_COLUMNS.to_vec();
    if report.is_some() {
        header.extend(FLAG_COLUMNS);
    }
    wtr.write_record(&header)?;

    for (i, record) in table.iter().enumerate() {
        let mut row = vec![
            record.transaction_date.to_string(),
            record.description.clone(),
            record.withdrawal_amount.to_string(),
            record.deposit_amount.to_string(),
            record.balance.to_string(),
        ];

        if let Some(flags) = report.and_then(|r| r.transactions.get(i)).map(|t| t.flags) {
            row.extend(
                [flags.is_large_dd, flags.is_large_rtgs, flags.is_suspicious_entity]
                    .iter()
                    .map(|f| f.to_string()),
            );
        }

        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Account metadata as a one-row CSV.
pub fn format_account_csv(info: &AccountInfo) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let entries = info.entries();

    wtr.write_record(entries.iter().map(|(key, _)| *key))?;
    wtr.write_record(entries.iter().map(|(_, value)| *value))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(extraction: &StatementExtraction, report: Option<&AnalysisReport>) -> String {
    let info = &extraction.account.info;
    let table = &extraction.transactions;
    let mut output = String::new();

    output.push_str(&format!("Bank: {} ({})\n", info.bank_name, extraction.issuer));
    output.push_str(&format!("Account holder: {}\n", info.account_holder_name));
    output.push_str(&format!("Account number: {}\n", info.account_number));
    output.push_str(&format!("Account type: {}\n", info.account_type));
    output.push_str(&format!("IFSC: {}\n", info.ifsc));
    output.push_str(&format!("MICR: {}\n", info.micr));
    output.push_str(&format!("Address: {}\n", info.address));
    output.push('\n');

    output.push_str(&format!("Transactions: {}\n", table.len()));
    output.push_str(&format!("  Withdrawals: {}\n", format_inr(table.total_withdrawals())));
    output.push_str(&format!("  Deposits:    {}\n", format_inr(table.total_deposits())));
    output.push('\n');

    for record in table {
        output.push_str(&format!(
            "  {}  {:<40}  {:>14}  {:>14}  {:>14}\n",
            record.transaction_date.format("%d-%m-%Y"),
            record.description,
            record.withdrawal_amount.to_string(),
            record.deposit_amount.to_string(),
            record.balance.to_string()
        ));
    }

    if let Some(report) = report {
        let summary = &report.summary;
        output.push('\n');
        output.push_str(&format!("Flagged: {}\n", summary.flagged_transactions));
        output.push_str(&format!("  Large DD withdrawals: {}\n", summary.large_dd_count));
        output.push_str(&format!("  Large RTGS deposits:  {}\n", summary.large_rtgs_count));
        output.push_str(&format!("  Suspicious entities:  {}\n", summary.suspicious_entity_count));

        for flagged in report.flagged() {
            output.push_str(&format!(
                "  ! {} {}\n",
                flagged.record.transaction_date.format("%d-%m-%Y"),
                flagged.record.description
            ));
        }
    }

    if !extraction.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &extraction.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}

/// Output path for `stem` in `dir`, optionally stamped with the current local time.
pub fn output_path(dir: &Path, stem: &str, extension: &str, timestamp: bool) -> PathBuf {
    let name = if timestamp {
        format!(
            "{}_{}.{}",
            stem,
            chrono::Local::now().format("%Y%m%d_%H%M%S"),
            extension
        )
    } else {
        format!("{}.{}", stem, extension)
    };

    dir.join(name)
}
