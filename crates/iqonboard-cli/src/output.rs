use colored::Colorize;
use iqonboard_core::{ReconcileReport, RowOutcome};
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_skip(msg: &str) {
    println!("{} {}", "↷".yellow(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "!".yellow().bold(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_banner(label: &str) {
    let rule = "-".repeat(40);
    println!("{} {} {}", rule.dimmed(), label.bold(), rule.dimmed());
}

pub fn print_outcome(outcome: &RowOutcome) {
    let msg = format!("line {}: {outcome}", outcome.line());
    match outcome {
        RowOutcome::Added { .. } => print_success(&msg),
        RowOutcome::SkippedExisting { .. } => print_skip(&msg),
        RowOutcome::SkippedNameTaken { .. } | RowOutcome::SkippedUnresolvedOrganization { .. } => {
            print_warning(&msg)
        }
        RowOutcome::Failed { .. } | RowOutcome::Unconfirmed { .. } | RowOutcome::Unreadable { .. } => {
            print_error(&msg)
        }
    }
}

pub fn print_required_columns(columns: &[&str]) {
    println!("{}", "Checking import file for required columns".cyan());
    println!("  {}", columns.join(", "));
}

pub fn print_report(report: &ReconcileReport) {
    let mut builder = Builder::default();
    builder.push_record(["Rows", "Added", "Skipped", "Failed"]);
    builder.push_record([
        report.rows.to_string(),
        report.added.to_string(),
        report.skipped.to_string(),
        report.failed.to_string(),
    ]);
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
}
