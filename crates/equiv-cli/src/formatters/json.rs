use equiv_core::Verdict;
use serde_json::json;

use crate::commands::cost::CostReport;
use crate::commands::search::FileMatches;

pub fn verdict_label(verdict: &Verdict<'_>) -> &'static str {
    match verdict {
        Verdict::Match(_) => "match",
        Verdict::Mismatch => "mismatch",
        Verdict::CostExceeded => "costExceeded",
    }
}

pub fn format_compare(a: &str, b: &str, verdict: &Verdict<'_>) -> String {
    let output = json!({
        "a": a,
        "b": b,
        "equivalent": verdict.is_match(),
        "verdict": verdict_label(verdict),
    });
    serde_json::to_string_pretty(&output).unwrap_or_default()
}

pub fn format_search(results: &[FileMatches]) -> String {
    let files: Vec<serde_json::Value> = results
        .iter()
        .filter(|f| !f.matches.is_empty())
        .map(|f| {
            json!({
                "filePath": f.file_path,
                "matches": f.matches,
            })
        })
        .collect();

    let output = json!({
        "summary": {
            "fileCount": results.len(),
            "matchCount": results.iter().map(|f| f.matches.len()).sum::<usize>(),
        },
        "files": files,
    });
    serde_json::to_string_pretty(&output).unwrap_or_default()
}

pub fn format_cost(report: &CostReport) -> String {
    let functions: Vec<serde_json::Value> = report
        .functions
        .iter()
        .map(|f| {
            json!({
                "name": f.name,
                "lines": [f.start_line, f.end_line],
                "cost": f.cost,
            })
        })
        .collect();

    let output = json!({
        "filePath": report.file_path,
        "total": report.total,
        "functions": functions,
    });
    serde_json::to_string_pretty(&output).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cost::FunctionCost;

    #[test]
    fn test_compare_output() {
        let out: serde_json::Value =
            serde_json::from_str(&format_compare("A.java", "B.java", &Verdict::Mismatch)).unwrap();
        assert_eq!(out["equivalent"], false);
        assert_eq!(out["verdict"], "mismatch");
    }

    #[test]
    fn test_cost_output() {
        let report = CostReport {
            file_path: "A.java".into(),
            total: 6,
            functions: vec![FunctionCost {
                name: "f".into(),
                start_line: 2,
                end_line: 4,
                cost: 6,
            }],
        };
        let out: serde_json::Value = serde_json::from_str(&format_cost(&report)).unwrap();
        assert_eq!(out["total"], 6);
        assert_eq!(out["functions"][0]["lines"], json!([2, 4]));
    }
}
