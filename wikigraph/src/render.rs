use colored::Colorize;
use serde_json::Value;
use wikigraph_core::{Exploration, ExplorationGraph};

pub fn print_banner() {
    println!(
        "{}",
        r#"
 _      __  _  __    _  _____                 __
| | /| / / (_)/ /__ (_)/ ___/____ ___ _ ___  / /
| |/ |/ / / //  '_// // (_ // __// _ `// _ \/ _ \
|__/|__/ /_//_/\_\/_/ \___//_/   \_,_// .__/_//_/
                                     /_/"#
            .bright_cyan()
            .bold()
    );
    println!();
}

fn divider() -> String {
    format!("{}\n", "━".repeat(60))
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

/// Human-readable node table for an exploration, highest score first.
pub fn generate_graph_report(graph: &ExplorationGraph) -> String {
    let mut report = String::new();
    report.push_str(&divider());

    let Some(root) = graph.nodes.first() else {
        report.push_str("  (empty graph)\n");
        return report;
    };

    report.push_str(&format!("# {}\n", root.label.bright_white().bold()));
    report.push_str(&format!(
        "  {} neighbors, {} edges\n\n",
        graph.nodes.len() - 1,
        graph.edges.len()
    ));

    let mut ranked: Vec<_> = graph.nodes.iter().collect();
    ranked.sort_by(|a, b| {
        b.score
            .unwrap_or(0.0)
            .partial_cmp(&a.score.unwrap_or(0.0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for node in ranked {
        let score = format!("{:.3}", node.score.unwrap_or(0.0));
        let summary = node.summary.as_deref().unwrap_or_default();
        report.push_str(&format!(
            "  {} {}\n",
            score.cyan(),
            node.label.bright_white()
        ));
        if !summary.is_empty() {
            report.push_str(&format!("        {}\n", truncate(summary, 100).dimmed()));
        }
    }

    report.push('\n');
    report.push_str(&divider());
    report
}

/// Titles and snippets from a raw search payload.
pub fn generate_search_report(results: &Value) -> String {
    let hits = results
        .pointer("/query/search")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut report = String::new();
    report.push_str(&format!("  {} results\n\n", hits.len()));
    for hit in &hits {
        let title = hit.get("title").and_then(Value::as_str).unwrap_or("?");
        let snippet = hit.get("snippet").and_then(Value::as_str).unwrap_or("");
        report.push_str(&format!("  {} {}\n", "•".blue(), title.bright_white()));
        if !snippet.is_empty() {
            report.push_str(&format!("      {}\n", strip_tags(snippet).dimmed()));
        }
    }
    report
}

/// One line per saved exploration.
pub fn generate_snapshot_report(explorations: &[Exploration]) -> String {
    let mut report = String::new();
    if explorations.is_empty() {
        report.push_str("  No saved explorations\n");
        return report;
    }
    for exploration in explorations {
        report.push_str(&format!(
            "  {} {} ({} nodes, {} edges)\n",
            exploration.id.dimmed(),
            exploration.name.bright_white(),
            exploration.nodes.len(),
            exploration.edges.len()
        ));
    }
    report
}

// Search snippets carry <span class="searchmatch"> highlighting.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
