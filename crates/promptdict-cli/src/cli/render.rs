use console::style;
use promptdict::diff::Diff;
use promptdict::model::Dataset;
use promptdict::presets::{MergeReport, PresetLibrary};
use promptdict::wrappers::ParsedToken;

pub(super) fn print_success(message: &str) {
    println!("{}", style(message).green());
}

pub(super) fn print_info(message: &str) {
    println!("{}", style(message).dim());
}

pub(super) fn print_dataset_summary(dataset: &Dataset) {
    for category in &dataset.categories {
        println!("{}", style(&category.name).bold());
        for group in &category.groups {
            let color = if group.color_str().is_empty() {
                String::new()
            } else {
                format!(" {}", style(group.color_str()).dim())
            };
            println!(
                "  {} {}{}",
                group.name,
                style(format!("({})", group.tags.len())).yellow(),
                color
            );
        }
    }
    println!(
        "{} categories, {} tags, languages: {}",
        dataset.categories.len(),
        dataset.tag_count(),
        dataset.languages.join(", ")
    );
}

pub(super) fn print_diff_summary(diff: &Diff) {
    if diff.is_empty() {
        print_info("No changes against the baseline.");
        return;
    }
    for category in &diff.categories {
        println!("{}", style(&category.name).bold());
        for group in &category.added_groups {
            println!("  {} {}", style("+").green(), group.name);
        }
        for name in &category.removed_groups {
            println!("  {} {}", style("-").red(), name);
        }
        for group in &category.groups {
            let mut parts = Vec::new();
            if !group.added.is_empty() {
                parts.push(format!("+{}", group.added.len()));
            }
            if !group.removed.is_empty() {
                parts.push(format!("-{}", group.removed.len()));
            }
            if !group.updated.is_empty() {
                parts.push(format!("~{}", group.updated.len()));
            }
            if group.order.is_some() {
                parts.push("reordered".to_string());
            }
            if group.color.is_some() {
                parts.push("color".to_string());
            }
            println!("  {} {}", style("~").yellow(), group.name);
            if !parts.is_empty() {
                println!("      {}", style(parts.join(" ")).dim());
            }
        }
    }
}

pub(super) fn print_library_summary(library: &PresetLibrary) {
    println!(
        "{} presets, {} folders, {} legacy",
        library.presets.len(),
        library.folders.len(),
        library.legacy.len()
    );
}

pub(super) fn print_merge_report(report: &MergeReport) {
    if report.is_noop() {
        print_info("Nothing to import.");
        return;
    }
    print_success(&format!(
        "Folders: {} created, {} matched. Presets: {} created, {} updated, {} from legacy.",
        report.folders_created,
        report.folders_matched,
        report.presets_created,
        report.presets_updated,
        report.legacy_imported
    ));
}

pub(super) fn print_token(parsed: &ParsedToken) {
    println!("{} {}", style("core:").dim(), parsed.core);
    let wrappers: Vec<&str> = parsed.wrappers.iter().map(|w| w.as_str()).collect();
    let shown = if wrappers.is_empty() {
        "-".to_string()
    } else {
        wrappers.join(" ")
    };
    println!("{} {}", style("wrappers:").dim(), shown);
}

pub(super) fn print_suggestions(keys: &[String]) {
    if keys.is_empty() {
        print_info("No matching tags.");
        return;
    }
    for key in keys {
        println!("{}", key);
    }
}
