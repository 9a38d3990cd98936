//! Pretty output formatting.

use carcheck_core::checklist::{
    completion_stats, group_by_section, Checklist, ChecklistItem, ChecklistSummary, CompletionStats,
};

/// Format a checklist header for display.
pub fn format_checklist(checklist: &Checklist) -> String {
    let car = if checklist.car_info.is_empty() {
        "(no car details)"
    } else {
        checklist.car_info.as_str()
    };
    let mut output = format!(
        "{}\n  ID: {}\n  Date: {}",
        car,
        checklist.id,
        checklist.date.format("%Y-%m-%d")
    );
    if checklist.has_vin() {
        output.push_str(&format!("\n  VIN: {}", checklist.vin));
    }
    output.push_str(&format!(
        "\n  Last modified: {}",
        checklist.last_modified.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output
}

/// Format progress as `answered/total (percent%)`.
pub fn format_stats(stats: &CompletionStats) -> String {
    let mut output = format!("{}/{} ({}%)", stats.answered, stats.total, stats.percent());
    if stats.is_complete() {
        output.push_str(" complete");
    }
    output
}

/// Format the checklist list with progress.
pub fn format_summaries(summaries: &[ChecklistSummary]) -> String {
    if summaries.is_empty() {
        return "No checklists found.".to_string();
    }
    let mut output = format!("CHECKLISTS ({})\n", summaries.len());
    output.push_str(&"-".repeat(40));
    for summary in summaries {
        output.push_str(&format!(
            "\n{}\n  Progress: {}",
            format_checklist(&summary.checklist),
            format_stats(&summary.stats)
        ));
        output.push('\n');
    }
    output
}

/// Format a single item line: `[x] #id question = value {options}`.
pub fn format_item(item: &ChecklistItem) -> String {
    let mark = if item.is_answered() { "x" } else { " " };
    let mut output = format!("[{}] #{} {}", mark, item.id, item.question);
    if let Some(value) = &item.value {
        output.push_str(&format!(" = {}", value));
    }
    if !item.options.is_empty() {
        output.push_str(&format!(" {{{}}}", item.options.join(" | ")));
    } else if item.kind.is_yes_no() {
        output.push_str(" {YES | NO}");
    }
    output
}

/// Format a checklist with its items grouped by section.
pub fn format_checklist_detail(checklist: &Checklist, items: &[ChecklistItem]) -> String {
    let mut output = format_checklist(checklist);
    output.push_str(&format!(
        "\n  Progress: {}",
        format_stats(&completion_stats(items))
    ));

    for (section, section_items) in group_by_section(items) {
        output.push_str(&format!("\n\n{}\n", section.display_name().to_uppercase()));
        output.push_str(&"-".repeat(40));
        for item in section_items {
            output.push_str(&format!("\n{}", format_item(item)));
        }
    }
    output
}
