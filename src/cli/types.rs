use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::models::ALL_REPORT_TYPES;

pub fn run() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Key", "Report", "Parser"]);
    for t in ALL_REPORT_TYPES {
        table.add_row(vec![
            Cell::new(t.key()),
            Cell::new(t.name()),
            Cell::new(if t.has_parser() { "yes" } else { "detect only" }),
        ]);
    }
    println!("Report types\n{table}");
    Ok(())
}
