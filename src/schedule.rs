//! Schedule extraction from the fixed-format course CSV.
//
// The source spreadsheet exports with a blank separator line and a header
// line before the data, and six columns per row: date, lecture, topic,
// required readings, additional readings, and an unused trailing column.

use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

/// The twelve English month abbreviations, matched case-sensitively.
const MONTH_ABBRS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One data row of the schedule, normalized and ready to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    /// 1-based month number parsed from the three-letter abbreviation.
    pub month_index: u32,
    /// Day of month as written; not checked against the month's length.
    pub day: u32,
    pub lecture_label: String,
    pub topic: String,
    /// Reading cells split on newline. Empty entries survive parsing and are
    /// only dropped when checklist items are created.
    pub required_readings: Vec<String>,
    pub additional_readings: Vec<String>,
}

/// Read and parse the schedule file at `path`.
pub fn load_schedule(path: &Path) -> Result<Vec<ScheduleRow>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read schedule file {}", path.display()))?;
    parse_schedule(&content)
}

/// Parse the schedule CSV into rows, in file order.
///
/// Any row without exactly six columns, and any date the schedule format
/// does not describe, aborts the whole parse; no partial output is produced.
pub fn parse_schedule(content: &str) -> Result<Vec<ScheduleRow>> {
    // The two leading lines are not CSV data. Drop them before the parser
    // sees them, so a fully blank first line cannot shift which lines get
    // skipped.
    let mut sections = content.splitn(3, '\n');
    sections.next();
    sections.next();
    let data = sections.next().unwrap_or("");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        // Line numbers reported to the user count from the top of the file,
        // including the two skipped lines.
        let line = index + 3;
        let record = record.with_context(|| format!("failed to read schedule row at line {line}"))?;
        if record.len() != 6 {
            return Err(anyhow!(
                "schedule row at line {line} has {} columns, expected 6",
                record.len()
            ));
        }

        let (month_index, day) = parse_date_token(&record[0])
            .with_context(|| format!("bad date in schedule row at line {line}"))?;

        rows.push(ScheduleRow {
            month_index,
            day,
            lecture_label: record[1].to_string(),
            topic: normalize_topic(&record[2]),
            required_readings: split_readings(&record[3]),
            additional_readings: split_readings(&record[4]),
        });
    }

    Ok(rows)
}

/// Parse a `"<Mon> <day>"` date token, e.g. `"Jan 5"`.
fn parse_date_token(token: &str) -> Result<(u32, u32)> {
    let token = token.trim();
    let (abbr, day) = token
        .split_once(' ')
        .ok_or_else(|| anyhow!("expected \"<month abbreviation> <day>\", got {:?}", token))?;

    let month_index = MONTH_ABBRS
        .iter()
        .position(|known| *known == abbr)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| anyhow!("unrecognized month abbreviation {:?}", abbr))?;

    let day = day
        .parse::<u32>()
        .with_context(|| format!("invalid day of month {:?}", day))?;

    Ok((month_index, day))
}

/// Flatten a multi-line topic cell into a single `" || "`-separated line.
///
/// The substitution order is load-bearing: a double newline collapses to one
/// separator, but a run of three or more newlines collapses asymmetrically.
/// The schedule exports we consume depend on this exact behavior, so do not
/// reorder the replacements.
pub fn normalize_topic(raw: &str) -> String {
    raw.trim()
        .replace('\n', "--")
        .replace("----", "--")
        .replace("--", " || ")
}

fn split_readings(cell: &str) -> Vec<String> {
    cell.trim().split('\n').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\n\
Date,Lecture,Topic,Required Readings,Additional Readings,Notes\n\
Jan 5,Lecture 1,\"Intro\nCourse logistics\",\"Chapter 1\n\nChapter 2\",Syllabus,\n\
Jan 15,Lecture 2,Parsing,Chapter 3,,\n";

    #[test]
    fn row_count_is_data_rows_only() {
        let rows = parse_schedule(SAMPLE).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn parses_dates_and_fields() {
        let rows = parse_schedule(SAMPLE).unwrap();
        assert_eq!(rows[0].month_index, 1);
        assert_eq!(rows[0].day, 5);
        assert_eq!(rows[0].lecture_label, "Lecture 1");
        assert_eq!(rows[0].topic, "Intro || Course logistics");
        assert_eq!(rows[1].day, 15);
        assert_eq!(rows[1].topic, "Parsing");
    }

    #[test]
    fn readings_keep_empty_entries() {
        let rows = parse_schedule(SAMPLE).unwrap();
        // The blank line between chapters survives as an empty entry.
        assert_eq!(
            rows[0].required_readings,
            vec!["Chapter 1".to_string(), String::new(), "Chapter 2".to_string()]
        );
        // An empty cell becomes a single empty entry, not an empty list.
        assert_eq!(rows[1].additional_readings, vec![String::new()]);
    }

    #[test]
    fn topic_single_newline_becomes_separator() {
        assert_eq!(normalize_topic("a\nb"), "a || b");
    }

    #[test]
    fn topic_double_newline_collapses_to_one_separator() {
        assert_eq!(normalize_topic("a\n\nb"), "a || b");
    }

    #[test]
    fn topic_triple_newline_collapses_asymmetrically() {
        // Three newlines leave two separators behind; this matches the
        // schedule exports we consume and must not be "fixed".
        assert_eq!(normalize_topic("a\n\n\nb"), "a ||  || b");
    }

    #[test]
    fn topic_normalization_is_idempotent_on_normalized_input() {
        let once = normalize_topic("a\nb\nc");
        assert_eq!(normalize_topic(&once), once);
    }

    #[test]
    fn unknown_month_abbreviation_is_fatal() {
        let csv = "\n\
Date,Lecture,Topic,Required Readings,Additional Readings,Notes\n\
Xyz 3,Lecture 1,Topic,,,\n";
        let err = parse_schedule(csv).unwrap_err();
        assert!(format!("{err:#}").contains("unrecognized month abbreviation"));
    }

    #[test]
    fn month_matching_is_case_sensitive() {
        let csv = "\n\
Date,Lecture,Topic,Required Readings,Additional Readings,Notes\n\
JAN 3,Lecture 1,Topic,,,\n";
        assert!(parse_schedule(csv).is_err());
    }

    #[test]
    fn day_is_not_bounds_checked() {
        let csv = "\n\
Date,Lecture,Topic,Required Readings,Additional Readings,Notes\n\
Feb 31,Lecture 1,Topic,,,\n";
        let rows = parse_schedule(csv).unwrap();
        assert_eq!((rows[0].month_index, rows[0].day), (2, 31));
    }

    #[test]
    fn wrong_column_count_is_fatal() {
        let csv = "\n\
Date,Lecture,Topic,Required Readings,Additional Readings,Notes\n\
Jan 5,Lecture 1,Topic,Chapter 1\n";
        let err = parse_schedule(csv).unwrap_err();
        assert!(err.to_string().contains("expected 6"));
    }

    #[test]
    fn loads_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(SAMPLE.as_bytes())?;
        let rows = load_schedule(file.path())?;
        assert_eq!(rows.len(), 2);
        Ok(())
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_schedule(Path::new("/nonexistent/schedule.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read schedule file"));
    }
}
