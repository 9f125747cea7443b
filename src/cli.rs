// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    ]
}

fn entry_args() -> [Arg; 3] {
    [
        Arg::new("description")
            .long("description")
            .short('d')
            .required(true),
        Arg::new("amount")
            .long("amount")
            .short('a')
            .required(true)
            .allow_hyphen_values(true)
            .help("Amount as a positive number; the income flag sets the sign"),
        Arg::new("income")
            .long("income")
            .action(ArgAction::SetTrue)
            .help("Record as income instead of an expense"),
    ]
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn recurrence_arg() -> Arg {
    Arg::new("recurrence")
        .long("recurrence")
        .short('r')
        .required(true)
        .help("monthly | yearly | twice_a_year | quarterly")
}

fn period_arg(help: &'static str) -> Arg {
    Arg::new("period")
        .long("period")
        .short('p')
        .required(true)
        .help(help)
}

pub fn build_cli() -> Command {
    Command::new("magicbudget")
        .about("Daily safe-to-spend number from one-off and recurring transactions")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("MAGICBUDGET_DB")
                .value_parser(value_parser!(PathBuf))
                .help("Ledger file (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .global(true)
                .env("MAGICBUDGET_TODAY")
                .help("Evaluate as of this date (YYYY-MM-DD) instead of the local date"),
        )
        .subcommand(Command::new("init").about("Create the ledger if missing"))
        .subcommand(
            Command::new("tx")
                .about("One-off transactions")
                .subcommand(
                    Command::new("add")
                        .args(entry_args())
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today")),
                )
                .subcommand(Command::new("edit").arg(id_arg()).args(entry_args()))
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .args(json_args()),
                )
                .subcommand(Command::new("today").args(json_args())),
        )
        .subcommand(
            Command::new("fixed")
                .about("Recurring obligations")
                .subcommand(Command::new("add").args(entry_args()).arg(recurrence_arg()))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .args(entry_args())
                        .arg(recurrence_arg()),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("refresh")
                        .about("Re-amortize obligations computed for another year"),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Description to category mappings")
                .subcommand(
                    Command::new("set").arg(
                        Arg::new("map")
                            .long("map")
                            .short('m')
                            .required(true)
                            .num_args(1..)
                            .action(ArgAction::Append)
                            .help("DESCRIPTION=LABEL, repeatable"),
                    ),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("show")
                        .arg(Arg::new("label").long("label").short('l').required(true))
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("summary")
                .about("Mapped entries and total for a period")
                .arg(period_arg("week | month | year"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("series")
                .about("Gap-filled grouped sums")
                .arg(period_arg("daily | monthly | yearly | type"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("magic")
                .about("Base and current magic number")
                .args(json_args()),
        )
        .subcommand(Command::new("stats").about("Daily, monthly and category report").args(json_args()))
        .subcommand(Command::new("overview").about("Today at a glance").args(json_args()))
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv | json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            )
            .subcommand(
                Command::new("fixed")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv | json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
}
