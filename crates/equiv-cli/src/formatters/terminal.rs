use colored::Colorize;
use equiv_core::Verdict;

use crate::commands::cost::CostReport;
use crate::commands::search::FileMatches;

pub fn format_compare(a: &str, b: &str, verdict: &Verdict<'_>) -> String {
    let status = match verdict {
        Verdict::Match(_) => "≡ equivalent".green().bold(),
        Verdict::Mismatch => "≠ different".red().bold(),
        Verdict::CostExceeded => "… cost budget exceeded".yellow().bold(),
    };
    format!("{status}  {} {} {}", a.bold(), "vs".dimmed(), b.bold())
}

pub fn format_search(results: &[FileMatches]) -> String {
    let total: usize = results.iter().map(|f| f.matches.len()).sum();
    if total == 0 {
        return "No matches found.".dimmed().to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    for file in results.iter().filter(|f| !f.matches.is_empty()) {
        let header = format!("─ {} ", file.file_path);
        let pad_len = 55usize.saturating_sub(header.chars().count());
        lines.push(format!("┌{header}{}", "─".repeat(pad_len)).dimmed().to_string());
        lines.push("│".dimmed().to_string());

        for m in &file.matches {
            let location = if m.start_line == m.end_line {
                format!("L{}", m.start_line)
            } else {
                format!("L{}-{}", m.start_line, m.end_line)
            };
            lines.push(format!(
                "{}  {} {} {}",
                "│".dimmed(),
                "⊕".green(),
                format!("{location:<10}").dimmed(),
                first_line(&m.text).bold(),
            ));
            for (name, value) in &m.bindings {
                lines.push(format!(
                    "{}      {} {}",
                    "│".dimmed(),
                    format!("${name}$ =").cyan(),
                    first_line(value),
                ));
            }
        }
        lines.push("│".dimmed().to_string());
        lines.push("└".dimmed().to_string());
    }

    let files = results.iter().filter(|f| !f.matches.is_empty()).count();
    lines.push(format!(
        "{} match{} in {} file{}",
        total,
        if total == 1 { "" } else { "es" },
        files,
        if files == 1 { "" } else { "s" },
    ));
    lines.join("\n")
}

pub fn format_cost(report: &CostReport) -> String {
    let mut lines = vec![format!(
        "{} {} {}",
        "cost:".green().bold(),
        report.file_path.bold(),
        report.total,
    )];
    for f in &report.functions {
        lines.push(format!(
            "  {} {} {}",
            format!("{:<25}", f.name).bold(),
            format!("L{}-{}", f.start_line, f.end_line).dimmed(),
            f.cost,
        ));
    }
    lines.join("\n")
}

/// Long matches are shown by their first line only.
fn first_line(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    if lines.next().is_some() {
        format!("{first} …")
    } else {
        first.to_string()
    }
}
