mod form;
mod gemini;
mod models;
mod repo;
mod run;
mod store;
mod sync;
mod util;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    let store = store::Store::open(&db_path)?;
    let mut repo = repo::BudgetRepo::new(store);

    match args.len() {
        1 => {
            run::print_usage();
            Ok(())
        }
        _ => run::as_cli(&args, &mut repo),
    }
}

fn get_db_path() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "construcost", "ConstruCost")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("construcost.db"))
}
