use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("`{field}` has {len} entries, no entry at position {index}")]
    OutOfRange {
        field: &'static str,
        index: usize,
        len: usize,
    },
}

/// Body of `GET /submissions/CIK##########.json`.
///
/// Only the fields the extractor reads are modelled; everything else the API
/// returns is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionsDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "sicDescription", default)]
    pub sic_description: Option<String>,
    #[serde(default)]
    pub filings: Option<FilingsData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilingsData {
    #[serde(default)]
    pub recent: Option<FilingEntry>,
}

/// The `recent` table: one column per attribute, position `i` of every column
/// describes the same filing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilingEntry {
    #[serde(rename = "form", default)]
    pub report_type: Vec<String>,
    #[serde(rename = "filingDate", default)]
    pub filing_date: Vec<String>,
    #[serde(rename = "accessionNumber", default)]
    pub accession_number: Vec<String>,
    #[serde(rename = "primaryDocument", default)]
    pub primary_document: Vec<String>,
    #[serde(rename = "primaryDocDescription", default)]
    pub primary_doc_description: Vec<Option<String>>,
}

/// One position of the recent table, zipped across columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingRow<'a> {
    pub form: &'a str,
    pub filing_date: &'a str,
    pub accession_number: &'a str,
    pub primary_document: &'a str,
    pub primary_doc_description: Option<&'a str>,
}

fn cell<'a, T>(column: &'a [T], field: &'static str, index: usize) -> Result<&'a T, ExtractError> {
    column.get(index).ok_or(ExtractError::OutOfRange {
        field,
        index,
        len: column.len(),
    })
}

impl SubmissionsDocument {
    /// The recent table, if the document carries one.
    pub fn recent(&self) -> Option<&FilingEntry> {
        self.filings.as_ref().and_then(|f| f.recent.as_ref())
    }
}

impl FilingEntry {
    pub fn len(&self) -> usize {
        self.report_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.report_type.is_empty()
    }

    /// Zip position `index` of every column into a [`FilingRow`].
    ///
    /// Fails with [`ExtractError::OutOfRange`] naming the first column that is
    /// too short.
    pub fn row(&self, index: usize) -> Result<FilingRow<'_>, ExtractError> {
        Ok(FilingRow {
            form: cell(&self.report_type, "form", index)?,
            filing_date: cell(&self.filing_date, "filingDate", index)?,
            accession_number: cell(&self.accession_number, "accessionNumber", index)?,
            primary_doc_description: cell(
                &self.primary_doc_description,
                "primaryDocDescription",
                index,
            )?
            .as_deref(),
            primary_document: cell(&self.primary_document, "primaryDocument", index)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let json = r#"{
            "cik": "1234567",
            "entityType": "operating",
            "name": "Acme",
            "tickers": [],
            "filings": {
                "recent": {
                    "form": ["D"],
                    "filingDate": ["2024-01-01"],
                    "accessionNumber": ["0001234567-24-000001"],
                    "primaryDocument": ["primary_doc.xml"],
                    "primaryDocDescription": [null],
                    "isXBRL": [0]
                },
                "files": []
            }
        }"#;
        let doc: SubmissionsDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.name.as_deref(), Some("Acme"));
        assert_eq!(doc.sic_description, None);

        let recent = doc.recent().unwrap();
        assert_eq!(recent.len(), 1);
        let row = recent.row(0).unwrap();
        assert_eq!(row.form, "D");
        assert_eq!(row.primary_doc_description, None);
    }

    #[test]
    fn test_missing_tables() {
        let doc: SubmissionsDocument = serde_json::from_str(r#"{"name":"Acme"}"#).unwrap();
        assert!(doc.recent().is_none());

        let doc: SubmissionsDocument =
            serde_json::from_str(r#"{"name":"Acme","filings":{}}"#).unwrap();
        assert!(doc.recent().is_none());

        let doc: SubmissionsDocument =
            serde_json::from_str(r#"{"filings":{"recent":{}}}"#).unwrap();
        assert!(doc.recent().unwrap().is_empty());
    }

    #[test]
    fn test_row_out_of_range_names_column() {
        let entry = FilingEntry {
            report_type: vec!["D".into(), "D".into()],
            filing_date: vec!["2024-01-01".into(), "2024-02-01".into()],
            accession_number: vec!["0000000001-24-000001".into()],
            primary_document: vec!["a.xml".into(), "b.xml".into()],
            primary_doc_description: vec![None, None],
        };

        assert!(entry.row(0).is_ok());
        assert_eq!(
            entry.row(1),
            Err(ExtractError::OutOfRange {
                field: "accessionNumber",
                index: 1,
                len: 1,
            })
        );
    }
}
