//! Plain-text rendering of the corpus analysis.
//!
//! ```text
//! ============================================================
//! ANALYSIS: TOP TF-IDF SCORES FOR TAGS
//! ============================================================
//!
//! Category: SPORT
//! football (0.743), league (0.309)
//! ```

use crate::features::{Analysis, LabelTerms};
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// Render the tag terms, trail-text terms and specialist table as one report.
pub fn render_analysis(analysis: &Analysis) -> String {
    let mut out = String::new();
    render_terms(&mut out, "TOP TF-IDF SCORES FOR TAGS", &analysis.tag_top);
    render_terms(&mut out, "TOP TF-IDF SCORES FOR TRAIL TEXT", &analysis.trail_top);

    banner(&mut out, &format!("TOP {} SPECIALIST AUTHORS", analysis.top_n));
    if analysis.specialists.is_empty() {
        out.push_str("No active authors found.\n");
        return out;
    }
    let _ = writeln!(out, "{:<30} | {:<15} | COUNT", "AUTHOR", "CATEGORY");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for s in &analysis.specialists {
        let _ = writeln!(out, "{:<30} | {:<15} | {}", s.author, s.label, s.articles);
    }
    out
}

fn render_terms(out: &mut String, title: &str, top: &[LabelTerms]) {
    banner(out, &format!("ANALYSIS: {title}"));
    for label_terms in top {
        let terms = label_terms
            .terms
            .iter()
            .map(|(term, score)| format!("{term} ({score:.3})"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "\nCategory: {}", label_terms.label.to_uppercase());
        let _ = writeln!(out, "{terms}");
    }
}

fn banner(out: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out, "\n{rule}\n{title}\n{rule}");
}
