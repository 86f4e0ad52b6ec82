//! CSV loading for the crawler's course table.

use super::{
    ensure_unique_titles, CourseRecord, ListField, NO_BRIEF, NO_DESCRIPTION, NO_DURATION, NO_LEVEL,
};
use crate::error::{CoursescoutError, Result};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

const COL_TITLE: &str = "Title";
const COL_BRIEF: &str = "Brief";
const COL_LEVEL: &str = "Level";
const COL_DURATION: &str = "Duration";
const COL_DESCRIPTION: &str = "Description";
const COL_LINK: &str = "Link";
const COL_CURRICULUM: &str = "Curriculum";
const COL_AUDIENCE: &str = "What should enroll & takeaway";

/// Load the course catalog from a CSV file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_csv(path: &Path) -> Result<Vec<CourseRecord>> {
    if !path.exists() {
        return Err(CoursescoutError::DataLoad(format!(
            "catalog file not found: {}",
            path.display()
        )));
    }

    let file = std::fs::File::open(path)?;
    let records = parse_catalog(file)?;
    info!("Loaded {} courses from {}", records.len(), path.display());
    Ok(records)
}

/// Column positions resolved from the header row.
struct Columns {
    title: usize,
    link: usize,
    brief: Option<usize>,
    level: Option<usize>,
    duration: Option<usize>,
    description: Option<usize>,
    curriculum: Option<usize>,
    audience: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                CoursescoutError::DataLoad(format!("catalog is missing required column '{}'", name))
            })
        };

        Ok(Self {
            title: require(COL_TITLE)?,
            link: require(COL_LINK)?,
            brief: find(COL_BRIEF),
            level: find(COL_LEVEL),
            duration: find(COL_DURATION),
            description: find(COL_DESCRIPTION),
            curriculum: find(COL_CURRICULUM),
            audience: find(COL_AUDIENCE),
        })
    }
}

fn cell<'a>(row: &'a csv::StringRecord, idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn text_or(row: &csv::StringRecord, idx: Option<usize>, placeholder: &str) -> String {
    cell(row, idx).unwrap_or(placeholder).to_string()
}

/// Parse a catalog table from any reader. Rows keep their input order.
pub fn parse_catalog<R: Read>(reader: R) -> Result<Vec<CourseRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        // Header is line 1.
        let line = i + 2;

        let title = cell(&row, Some(columns.title)).ok_or_else(|| {
            CoursescoutError::DataLoad(format!("row {} has no {}", line, COL_TITLE))
        })?;
        let link = cell(&row, Some(columns.link)).ok_or_else(|| {
            CoursescoutError::DataLoad(format!("row {} ('{}') has no {}", line, title, COL_LINK))
        })?;

        let record = CourseRecord {
            title: title.to_string(),
            brief: text_or(&row, columns.brief, NO_BRIEF),
            level: text_or(&row, columns.level, NO_LEVEL),
            duration: text_or(&row, columns.duration, NO_DURATION),
            description: text_or(&row, columns.description, NO_DESCRIPTION),
            url: link.to_string(),
            curriculum: cell(&row, columns.curriculum)
                .map(ListField::parse)
                .unwrap_or_default(),
            audience_and_takeaways: cell(&row, columns.audience)
                .map(ListField::parse)
                .unwrap_or_default(),
        };
        record.validate()?;

        debug!("Parsed course '{}'", record.title);
        records.push(record);
    }

    ensure_unique_titles(&records)?;
    Ok(records)
}
