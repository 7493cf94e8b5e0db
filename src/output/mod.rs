pub mod formatter;

pub use formatter::{
    format_grade, format_mock_table, format_number, format_ranking_table, format_report_table,
    format_report_tsv, should_use_colors,
};
