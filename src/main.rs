// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;

use magicbudget::{cli, commands, db, ledger::SqliteLedger, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_override = matches.get_one::<PathBuf>("db");
    let today = match matches.get_one::<String>("today") {
        Some(s) => utils::parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let ledger = SqliteLedger::new(db::open_or_init(db_override.map(PathBuf::as_path))?);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "Database initialized at {}",
                db::db_path(db_override.map(PathBuf::as_path))?.display()
            );
        }
        Some(("tx", sub)) => commands::transactions::handle(&ledger, sub, today)?,
        Some(("fixed", sub)) => commands::fixed::handle(&ledger, sub, today)?,
        Some(("category", sub)) => commands::categories::handle(&ledger, sub, today)?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, sub)?,
        Some((name @ ("summary" | "series" | "magic" | "stats" | "overview"), sub)) => {
            commands::reports::handle(&ledger, name, sub, today)?
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
