//! Validate command - surface cart data problems without pricing anything

use crate::cart::validate_cart;
use crate::cmd::read_cart;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Cart file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    cart: PathBuf,

    /// Delivery fee in pounds (overrides any value in a JSON cart)
    #[arg(short, long)]
    delivery_fee: Option<Decimal>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    line_count: usize,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let (items, file_delivery) = read_cart(&self.cart)?;
        let delivery_fee = self
            .delivery_fee
            .or(file_delivery)
            .unwrap_or(Decimal::ZERO);

        let issues: Vec<ValidationIssue> = validate_cart(&items, delivery_fee)
            .iter()
            .map(|issue| ValidationIssue {
                issue_type: issue.kind().to_string(),
                message: issue.to_string(),
            })
            .collect();

        if self.json {
            self.print_json(&issues, items.len())?;
        } else {
            self.print_text(&issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue]) {
        println!();
        println!("VALIDATION RESULTS");
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
        } else {
            println!("\u{26A0} {} issue(s) found:", issues.len());
            println!();

            for (i, issue) in issues.iter().enumerate() {
                println!("  {}. [{}] {}", i + 1, issue.issue_type, issue.message);
            }
            println!();
        }
    }

    fn print_json(&self, issues: &[ValidationIssue], line_count: usize) -> anyhow::Result<()> {
        let output = ValidationOutput {
            line_count,
            issue_count: issues.len(),
            issues: issues.to_vec(),
        };

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
