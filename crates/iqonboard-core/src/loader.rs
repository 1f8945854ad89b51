//! CSV import file reader.
//!
//! The header is validated eagerly when the reader is built; rows are decoded
//! lazily, one per `next()`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};

use crate::error::{OnboardError, Result};
use crate::model::ImportRow;

pub const ORGANIZATION_NAME: &str = "organizationName";
pub const PUBLIC_ID: &str = "publicId";
pub const NAME: &str = "name";
pub const APPLICATION_TAGS: &str = "applicationTags";

pub const REQUIRED_COLUMNS: [&str; 4] = [ORGANIZATION_NAME, PUBLIC_ID, NAME, APPLICATION_TAGS];

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    organization_name: usize,
    public_id: usize,
    name: usize,
    application_tags: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |column: &str| headers.iter().position(|h| h == column);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|&column| position(column).is_none())
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(OnboardError::MissingColumns { missing });
        }

        // every column was found above
        let at = |column: &str| position(column).unwrap_or_default();
        Ok(Self {
            organization_name: at(ORGANIZATION_NAME),
            public_id: at(PUBLIC_ID),
            name: at(NAME),
            application_tags: at(APPLICATION_TAGS),
        })
    }
}

pub struct ImportReader<R> {
    records: csv::Reader<R>,
    columns: ColumnIndex,
}

impl ImportReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let records = builder()
            .from_path(path)
            .map_err(|source| OnboardError::ImportFile {
                path: path.display().to_string(),
                source,
            })?;
        Self::with_records(records, &path.display().to_string())
    }
}

impl<R: Read> ImportReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::with_records(builder().from_reader(reader), "<reader>")
    }

    fn with_records(mut records: csv::Reader<R>, origin: &str) -> Result<Self> {
        let headers = records
            .headers()
            .map_err(|source| OnboardError::ImportFile {
                path: origin.to_string(),
                source,
            })?;
        let columns = ColumnIndex::from_headers(headers)?;
        tracing::debug!(origin, ?columns, "Import file header validated");
        Ok(Self { records, columns })
    }

    /// Rows in file order. A malformed record yields an error for that row only.
    pub fn rows(self) -> ImportRows<R> {
        ImportRows {
            records: self.records.into_records(),
            columns: self.columns,
        }
    }
}

pub struct ImportRows<R> {
    records: StringRecordsIntoIter<R>,
    columns: ColumnIndex,
}

impl<R: Read> Iterator for ImportRows<R> {
    type Item = Result<ImportRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(match record {
            Ok(record) => Ok(self.columns.row(&record)),
            Err(source) => Err(OnboardError::MalformedRow {
                line: source.position().map(|p| p.line()).unwrap_or_default(),
                source,
            }),
        })
    }
}

impl ColumnIndex {
    fn row(&self, record: &StringRecord) -> ImportRow {
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        ImportRow {
            line: record.position().map(|p| p.line()).unwrap_or_default(),
            organization_name: field(self.organization_name),
            public_id: field(self.public_id),
            name: field(self.name),
            application_tags: split_tags(record.get(self.application_tags).unwrap_or_default()),
        }
    }
}

/// Split a comma-joined tag cell and trim each tag name. An empty cell gives
/// one empty name.
pub fn split_tags(cell: &str) -> Vec<String> {
    cell.split(',').map(|tag| tag.trim().to_string()).collect()
}

// Field values stay verbatim: publicId and name are matched against the
// server exactly.
fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.trim(Trim::Headers).flexible(true);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(csv: &str) -> Vec<ImportRow> {
        ImportReader::from_reader(csv.as_bytes())
            .unwrap()
            .rows()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn parses_rows_in_file_order() {
        let rows = rows(
            "organizationName,publicId,name,applicationTags\n\
             OrgA,app1,App One,\"tag1,tag2\"\n\
             ,app2,,\n",
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].organization_name, "OrgA");
        assert_eq!(rows[0].public_id, "app1");
        assert_eq!(rows[0].application_tags, vec!["tag1", "tag2"]);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].name, "");
        assert_eq!(rows[1].application_tags, vec![""]);
    }

    #[test]
    fn column_order_does_not_matter() {
        let rows = rows("applicationTags,name,publicId,organizationName,extra\nt1,N,p,O,x\n");
        assert_eq!(rows[0].public_id, "p");
        assert_eq!(rows[0].organization_name, "O");
        assert_eq!(rows[0].application_tags, vec!["t1"]);
    }

    #[test]
    fn reports_every_missing_column() {
        let err = ImportReader::from_reader("publicId,name\n".as_bytes())
            .err()
            .unwrap();
        match err {
            OnboardError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["organizationName", "applicationTags"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_columns_is_a_validation_error() {
        let err = ImportReader::from_reader("name\n".as_bytes()).err().unwrap();
        assert!(err.is_validation_error());
    }

    #[test]
    fn short_rows_default_to_empty_fields() {
        let rows = rows("organizationName,publicId,name,applicationTags\nOrgA,app1\n");
        assert_eq!(rows[0].name, "");
        assert_eq!(rows[0].application_tags, vec![""]);
    }

    #[test]
    fn open_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"organizationName,publicId,name,applicationTags\nOrgA,app1,App One,tag1\n",
        )
        .unwrap();

        let rows: Vec<_> = ImportReader::open(file.path()).unwrap().rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_ref().unwrap().name, "App One");
    }

    #[test]
    fn open_missing_file_is_not_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImportReader::open(dir.path().join("absent.csv")).err().unwrap();
        assert!(matches!(err, OnboardError::ImportFile { .. }));
        assert!(!err.is_validation_error());
    }

    #[test]
    fn field_values_are_not_trimmed() {
        let rows = rows(
            " organizationName , publicId,name,applicationTags\n\
             OrgA, app1 ,App One , tag1\n",
        );
        assert_eq!(rows[0].public_id, " app1 ");
        assert_eq!(rows[0].name, "App One ");
        assert_eq!(rows[0].organization_name, "OrgA");
        assert_eq!(rows[0].application_tags, vec!["tag1"]);
    }

    #[test]
    fn tags_are_trimmed() {
        assert_eq!(split_tags("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_tags(""), vec![""]);
    }
}
