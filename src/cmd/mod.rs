pub mod html_report;
pub mod items;
pub mod schema;
pub mod totals;
pub mod validate;

use crate::cart::{self, LineItem};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a cart from CSV or JSON (or stdin with "-"), returning the items
/// and any file-level delivery fee (JSON only)
pub fn read_cart(path: &Path) -> anyhow::Result<(Vec<LineItem>, Option<Decimal>)> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        read_from_file(path)
    }
}

fn read_from_file(path: &Path) -> anyhow::Result<(Vec<LineItem>, Option<Decimal>)> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => cart::read_json(reader),
        _ => {
            // Default to CSV for .csv files and any other extension
            let items = cart::read_csv(reader)?;
            Ok((items, None))
        }
    }
}

fn read_from_stdin() -> anyhow::Result<(Vec<LineItem>, Option<Decimal>)> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    // No extension to go by: JSON input starts with '{'
    let is_json = buffer
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{');

    let cursor = io::Cursor::new(buffer);
    if is_json {
        cart::read_json(cursor)
    } else {
        let items = cart::read_csv(cursor)?;
        Ok((items, None))
    }
}
