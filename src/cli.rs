// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn project_arg() -> Arg {
    Arg::new("project")
        .long("project")
        .value_name("ID_OR_NAME")
        .help("Project to operate on (defaults to the first)")
}

fn yes_arg() -> Arg {
    Arg::new("yes")
        .long("yes")
        .action(ArgAction::SetTrue)
        .help("Skip the confirmation prompt")
}

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("importdesk")
        .about("Shared import-purchase tracking: prices, taxes, shipping and margins per project")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(
            Command::new("project")
                .about("Manage projects")
                .subcommand(json_args(Command::new("list").about("List projects with totals")))
                .subcommand(
                    Command::new("new")
                        .about("Create a project and switch to it")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a project (writes the collection without it)")
                        .arg(Arg::new("key").required(true).value_name("ID_OR_NAME"))
                        .arg(yes_arg()),
                ),
        )
        .subcommand(
            Command::new("entry")
                .about("Manage priced line items")
                .subcommand(entry_fields(
                    Command::new("add")
                        .about("Add an entry (newest first)")
                        .arg(project_arg()),
                ))
                .subcommand(
                    json_args(
                        Command::new("list")
                            .about("List entries through the project's filters")
                            .arg(project_arg()),
                    )
                    .arg(Arg::new("search").long("search").help("Substring filter"))
                    .arg(
                        Arg::new("status")
                            .long("status")
                            .value_name("any|ordered|in-transit|delivered"),
                    )
                    .arg(Arg::new("paid").long("paid").value_name("any|paid|pending")),
                )
                .subcommand(entry_fields(
                    Command::new("edit")
                        .about("Edit an entry in place")
                        .arg(Arg::new("id").required(true))
                        .arg(project_arg()),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete an entry")
                        .arg(Arg::new("id").required(true))
                        .arg(project_arg())
                        .arg(yes_arg()),
                )
                .subcommand(
                    Command::new("pay")
                        .about("Toggle the paid flag")
                        .arg(Arg::new("id").required(true))
                        .arg(project_arg()),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Per-project defaults and currency parameters")
                .subcommand(Command::new("show").arg(project_arg()))
                .subcommand(
                    Command::new("set")
                        .arg(project_arg())
                        .arg(Arg::new("default-iof").long("default-iof").value_name("PCT"))
                        .arg(Arg::new("default-tax").long("default-tax").value_name("PCT"))
                        .arg(Arg::new("tier1").long("tier1").value_name("AMOUNT"))
                        .arg(Arg::new("tier2").long("tier2").value_name("AMOUNT"))
                        .arg(Arg::new("tier3").long("tier3").value_name("AMOUNT"))
                        .arg(Arg::new("rate").long("rate").value_name("BRL_PER_USD"))
                        .arg(Arg::new("mode").long("mode").value_name("brl|usd")),
                ),
        )
        .subcommand(
            Command::new("notes")
                .about("Project free-text notes")
                .subcommand(Command::new("show").arg(project_arg()))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("text").required(true))
                        .arg(project_arg()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export a project's entries with derived figures")
                .arg(project_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .value_name("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true).value_name("PATH")),
        )
        .subcommand(Command::new("doctor").about("Check stored records against the derivation invariants"))
}

fn entry_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("description").long("description").value_name("TEXT"))
        .arg(Arg::new("recipient").long("recipient").value_name("TEXT"))
        .arg(Arg::new("supplier").long("supplier").value_name("TEXT"))
        .arg(Arg::new("invoice").long("invoice").value_name("TEXT"))
        .arg(Arg::new("eta").long("eta").value_name("TEXT"))
        .arg(Arg::new("note").long("note").value_name("TEXT"))
        .arg(
            Arg::new("base")
                .long("base")
                .value_name("AMOUNT")
                .help("Base price, in the project's display currency"),
        )
        .arg(Arg::new("iof").long("iof").value_name("PCT"))
        .arg(Arg::new("tax").long("tax").value_name("PCT"))
        .arg(Arg::new("shipping").long("shipping").value_name("AMOUNT"))
        .arg(
            Arg::new("tier")
                .long("tier")
                .value_name("1|2|3")
                .value_parser(clap::value_parser!(usize))
                .conflicts_with("shipping")
                .help("Use a preset shipping tier instead of a custom amount"),
        )
        .arg(
            Arg::new("tax-free")
                .long("tax-free")
                .action(ArgAction::SetTrue)
                .help("Flat 10% reduction on the operator's cost basis"),
        )
        .arg(Arg::new("status").long("status").value_name("ordered|in-transit|delivered"))
        .arg(Arg::new("paid").long("paid").action(ArgAction::SetTrue))
}
