use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::grading::LetterGrade;
use crate::mock::MockSummary;
use crate::report::{CohortReport, ReportCard};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with at most 2 decimals, dropping trailing zeros
/// (68, 56.67, 80.5)
pub fn format_number(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// "B (Very Good)", or just the grade when the remark is empty
pub fn format_grade(letter: &LetterGrade) -> String {
    if letter.remark.is_empty() {
        letter.grade.clone()
    } else {
        format!("{} ({})", letter.grade, letter.remark)
    }
}

/// Position column text; unranked students show a dash
fn position_cell(position: &str) -> &str {
    if position.is_empty() {
        "-"
    } else {
        position
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn fit_name(name: &str, fixed_width: usize) -> String {
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => truncate_name(name, width - fixed_width),
        Some(_) => truncate_name(name, 20),
        None => name.to_string(),
    }
}

fn cohort_heading(report: &CohortReport, use_colors: bool) -> String {
    let heading = format!(
        "{} ({} ranked of {})",
        report.cohort,
        report.total_students,
        report.cards.len()
    );
    if use_colors {
        heading.bold().to_string()
    } else {
        heading
    }
}

/// Format a full report: a summary line per student followed by one line per
/// subject.
pub fn format_report_table(report: &CohortReport, use_colors: bool) -> String {
    if report.cards.is_empty() {
        return format!("{}\n  No results found.", cohort_heading(report, use_colors));
    }

    let mut lines = vec![cohort_heading(report, use_colors)];
    for card in &report.cards {
        lines.push(format_card_summary(card, use_colors));
        for subject in &card.subjects {
            let row = format!(
                "      {:<20} CA {:>6}  Exam {:>6}  Total {:>6}  {:<3} {:<14} {:>5}",
                truncate_name(&subject.subject, 20),
                format_number(subject.ca),
                format_number(subject.exam),
                format_number(subject.total),
                subject.grade,
                subject.remark,
                position_cell(&subject.position)
            );
            lines.push(if use_colors {
                row.dimmed().to_string()
            } else {
                row
            });
        }
    }
    lines.join("\n")
}

fn format_card_summary(card: &ReportCard, use_colors: bool) -> String {
    let position = format!("{:>5}", position_cell(&card.position));
    let totals = format!(
        "total {}  avg {}  {}",
        format_number(card.overall_total),
        format_number(card.average),
        format_grade(&card.grade)
    );
    let name = fit_name(&card.student_name, position.len() + totals.len() + 4);

    if use_colors {
        format!("{}  {}  {}", position.bold(), name.cyan(), totals)
    } else {
        format!("{}  {}  {}", position, name, totals)
    }
}

/// Format overall positions only, one student per line
/// Columns: position, total, average, name
pub fn format_ranking_table(report: &CohortReport, use_colors: bool) -> String {
    let mut lines = vec![cohort_heading(report, use_colors)];
    if report.cards.is_empty() {
        lines.push("  No results found.".to_string());
        return lines.join("\n");
    }

    // position (5) + total (8) + average (7) + separators
    let fixed_width = 5 + 8 + 7 + 6;
    for card in &report.cards {
        let position = format!("{:>5}", position_cell(&card.position));
        let total = format!("{:>8}", format_number(card.overall_total));
        let average = format!("{:>7}", format_number(card.average));
        let name = fit_name(&card.student_name, fixed_width);
        if use_colors {
            lines.push(format!("{}  {}  {}  {}", position.bold(), total, average.dimmed(), name));
        } else {
            lines.push(format!("{}  {}  {}  {}", position, total, average, name));
        }
    }
    lines.join("\n")
}

/// Format a report as tab-separated values for scripting, one row per subject
/// Columns: class, year, term, student_id, name, subject, ca, exam, total,
/// grade, subject position, overall position (no headers, no colors)
pub fn format_report_tsv(report: &CohortReport) -> String {
    report
        .cards
        .iter()
        .flat_map(|card| {
            card.subjects.iter().map(move |subject| {
                let ca = format_number(subject.ca);
                let exam = format_number(subject.exam);
                let total = format_number(subject.total);
                [
                    report.cohort.class_id.as_str(),
                    report.cohort.academic_year.as_str(),
                    report.cohort.term.as_str(),
                    card.student_id.as_str(),
                    card.student_name.as_str(),
                    subject.subject.as_str(),
                    ca.as_str(),
                    exam.as_str(),
                    total.as_str(),
                    subject.grade.as_str(),
                    subject.position.as_str(),
                    card.position.as_str(),
                ]
                .join("\t")
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format mock summaries best first
/// Columns: index, aggregate, raw average, name
pub fn format_mock_table(summaries: &[MockSummary], use_colors: bool) -> String {
    if summaries.is_empty() {
        return "No mock entries found.".to_string();
    }

    let fixed_width = 3 + 1 + 9 + 2 + 7 + 2;
    summaries
        .iter()
        .enumerate()
        .map(|(idx, summary)| {
            let index_str = format!("{:>2}.", idx + 1);
            let aggregate = format!("{:>9}", format!("agg {}", summary.aggregate));
            let average = format!("{:>7}", format!("avg {}", summary.raw_average));
            let name = fit_name(&summary.student_name, fixed_width);
            if use_colors {
                format!(
                    "{} {}  {}  {}",
                    index_str.dimmed(),
                    aggregate.bold(),
                    average,
                    name
                )
            } else {
                format!("{} {}  {}  {}", index_str, aggregate, average, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
