use colored::Colorize;
use serde::Serialize;

use crate::dag::RankMap;
use crate::scan::ScanFailure;

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg.green());
}

/// Print an error message.
pub fn print_error(msg: &str) {
    println!("{} {}", "✗".red().bold(), msg.red());
}

/// Print a neutral informational line.
pub fn print_info(msg: &str) {
    println!("  {} {}", "→".blue(), msg);
}

/// List files the scanner could not parse.
pub fn print_scan_failures(failures: &[ScanFailure]) {
    if failures.is_empty() {
        return;
    }
    println!();
    println!("{}", format!("Unparsed Files ({})", failures.len()).bold().yellow());
    println!("{}", "─".repeat(60));
    for failure in failures {
        println!(
            "  {} {} {}",
            "!".yellow(),
            failure.path.display().to_string().bold(),
            failure.error.to_string().dimmed()
        );
    }
    println!("{}", "─".repeat(60));
}

/// Print rank levels, deepest first.
pub fn print_ranks(ranks: &RankMap) {
    println!();
    println!("{}", "Module Ranks".bold().cyan());
    println!("{}", "─".repeat(50));
    let levels: Vec<(usize, &[String])> = ranks.levels().collect();
    for (rank, names) in levels.into_iter().rev() {
        println!("  {} {}", format!("{:>3}", rank).bold(), names.join(", "));
    }
    println!();
}

/// Print detected import cycles.
pub fn print_cycles(cycles: &[Vec<String>]) {
    if cycles.is_empty() {
        return;
    }
    println!("{}", format!("Import Cycles ({})", cycles.len()).bold().yellow());
    for cycle in cycles {
        println!("  {} {}", "↻".yellow(), cycle.join(" ↔ "));
    }
    println!();
}

/// List imported names that no scanned file declares.
pub fn print_unresolved<'a>(names: impl IntoIterator<Item = &'a str>) {
    let names: Vec<&str> = names.into_iter().collect();
    if names.is_empty() {
        return;
    }
    println!(
        "  {} {} undeclared import(s): {}",
        "?".yellow(),
        names.len(),
        names.join(", ").dimmed()
    );
}

#[derive(Serialize)]
struct RankDocument<'a> {
    #[serde(flatten)]
    ranks: &'a RankMap,
    cycles: &'a [Vec<String>],
}

/// Machine-readable form of the rank map and cycles.
pub fn ranks_json(ranks: &RankMap, cycles: &[Vec<String>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&RankDocument { ranks, cycles })
}
