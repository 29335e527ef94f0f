// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn month_arg(required: bool) -> Arg {
    Arg::new("month")
        .long("month")
        .required(required)
        .help("Month as YYYY-MM")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Transaction id")
}

fn tx_command() -> Command {
    Command::new("tx")
        .about("Record and manage revenues and expenses")
        .subcommand(
            Command::new("add")
                .about("Add a transaction, a recurring transaction or an installment plan")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("income | expense"),
                )
                .arg(Arg::new("description").long("description").required(true))
                .arg(
                    Arg::new("value")
                        .long("value")
                        .required(true)
                        .help("Total value; split evenly across installments"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .required(true)
                        .help("YYYY-MM-DD; first installment or recurrence anchor"),
                )
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("icon").long("icon"))
                .arg(
                    Arg::new("party")
                        .long("party")
                        .help("Client or provider"),
                )
                .arg(Arg::new("notes").long("notes"))
                .arg(
                    Arg::new("recurring")
                        .long("recurring")
                        .action(ArgAction::SetTrue)
                        .help("Repeat every month from the date onward"),
                )
                .arg(
                    Arg::new("installments")
                        .long("installments")
                        .help("Split into N monthly installments"),
                ),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List stored records, or a month's occurrences with --month")
                .arg(month_arg(false))
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("status").long("status"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("pay")
                .about("Mark a transaction as paid (or received)")
                .arg(id_arg()),
        )
        .subcommand(
            Command::new("status")
                .about("Set the status of a transaction")
                .arg(id_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .help("pending | paid | received | overdue"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Change the value of a transaction")
                .arg(id_arg())
                .arg(Arg::new("value").long("value").required(true)),
        )
        .subcommand(json_args(
            Command::new("group")
                .about("Show the installments of a group")
                .arg(Arg::new("group_id").long("group-id").required(true)),
        ))
}

fn goal_command() -> Command {
    Command::new("goal")
        .about("Monthly income goals")
        .subcommand(
            Command::new("set")
                .arg(month_arg(true))
                .arg(Arg::new("amount").long("amount").required(true)),
        )
        .subcommand(json_args(Command::new("show").arg(month_arg(true))))
        .subcommand(json_args(Command::new("list")))
}

fn report_command() -> Command {
    Command::new("report")
        .about("Monthly summaries")
        .subcommand(json_args(
            Command::new("summary")
                .about("Income, expense, balance, change and goal progress for a month")
                .arg(month_arg(true)),
        ))
        .subcommand(json_args(
            Command::new("categories")
                .about("Top expense categories for a month")
                .arg(month_arg(true)),
        ))
        .subcommand(json_args(
            Command::new("cashflow")
                .about("Income and expense for the trailing months")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(usize))
                        .default_value("12"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Last month as YYYY-MM (default: current month)"),
                ),
        ))
        .subcommand(
            Command::new("watch")
                .about("Reprint the month summary whenever the data changes")
                .arg(month_arg(true))
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .value_parser(value_parser!(u64))
                        .default_value("2")
                        .help("Seconds between polls"),
                )
                .arg(
                    Arg::new("ticks")
                        .long("ticks")
                        .value_parser(value_parser!(usize))
                        .help("Stop after this many polls"),
                ),
        )
}

pub fn build_cli() -> Command {
    Command::new("brokerbooks")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Revenue, expense and goal tracking for real-estate brokers")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Act as this user instead of the stored profile"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("profile")
                .about("Current user")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-user")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(tx_command())
        .subcommand(goal_command())
        .subcommand(report_command())
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions")
                    .about("Import transactions from CSV")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
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
            ),
        )
        .subcommand(Command::new("doctor").about("Look for data issues"))
}
