use crate::db::{count_imports, get_connection, list_imports, DB_FILE};
use crate::error::Result;
use crate::models::get_by_key;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join(DB_FILE);

    let company = if settings.company_name.is_empty() {
        "(not set)"
    } else {
        settings.company_name.as_str()
    };
    println!("Company:    {company}");
    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if !db_path.exists() {
        println!();
        println!("Database not found. Run `qbimport init` to set up.");
        return Ok(());
    }

    let conn = get_connection(&db_path)?;
    println!();
    println!("Imports:    {}", count_imports(&conn)?);

    let mut by_type: Vec<(String, usize)> = Vec::new();
    for r in list_imports(&conn, None)? {
        let name = get_by_key(&r.report_type).map_or(r.report_type.clone(), |t| t.name().to_string());
        match by_type.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => by_type.push((name, 1)),
        }
    }
    for (name, count) in by_type {
        println!("  {name:<28} {count}");
    }
    Ok(())
}
