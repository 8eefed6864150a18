//! Loading the catalog file.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::COLUMN_COUNT;
use crate::error::{CatalogError, Result};
use crate::parser::LineParser;
use crate::row::{CatalogRow, ScoredRow};
use crate::search::top_k;
use crate::vector::parse_vector;

/// Options for reading a catalog file.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Line splitter.
    pub parser: LineParser,

    /// Whether the first line is a header to skip.
    pub has_header: bool,
}

impl LoadOptions {
    /// Use a different field delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.parser = LineParser::new(delimiter, '"');
        self
    }

    /// Treat the first line as data.
    pub fn without_header(mut self) -> Self {
        self.has_header = false;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            parser: LineParser::default(),
            has_header: true,
        }
    }
}

/// An immutable, in-memory snapshot of the catalog file.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rows: Vec<CatalogRow>,
    source: Option<PathBuf>,
}

impl Catalog {
    /// Build a catalog from rows already in memory.
    pub fn new(rows: Vec<CatalogRow>) -> Self {
        Self { rows, source: None }
    }

    /// Read a catalog file from disk.
    pub fn from_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut catalog = Self::read(BufReader::new(file), options, &path.display().to_string())?;
        catalog.source = Some(path.to_path_buf());

        info!(
            "Loaded {} catalog rows from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Read a catalog from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> Result<Self> {
        Self::read(reader, options, "<reader>")
    }

    fn read<R: BufRead>(reader: R, options: &LoadOptions, origin: &str) -> Result<Self> {
        let mut rows = Vec::new();
        let mut dimension = None;
        let mut header_pending = options.has_header;

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|source| CatalogError::Io {
                path: origin.to_string(),
                source,
            })?;

            if line.trim().is_empty() {
                continue;
            }
            if header_pending {
                header_pending = false;
                debug!("Skipping catalog header: {line}");
                continue;
            }

            let fields = options.parser.split(&line);
            let row = parse_row(&fields, line_number)?;

            match dimension {
                None => dimension = Some(row.vector.len()),
                Some(expected) if expected != row.vector.len() => {
                    return Err(CatalogError::InconsistentDimension {
                        line: line_number,
                        expected,
                        actual: row.vector.len(),
                    });
                }
                Some(_) => {}
            }

            rows.push(row);
        }

        Ok(Self { rows, source: None })
    }

    /// All rows in file order.
    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the catalog has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Vector dimension shared by every row.
    pub fn dimension(&self) -> Option<usize> {
        self.rows.first().map(|row| row.vector.len())
    }

    /// Distinct embedding model tags found in the file.
    pub fn model_tags(&self) -> BTreeSet<&str> {
        self.rows
            .iter()
            .map(|row| row.embedding_model.as_str())
            .collect()
    }

    /// File the catalog was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Rows most similar to `query`, best first.
    pub fn top_k(&self, query: &[f32], k: usize) -> Result<Vec<ScoredRow>> {
        top_k(&self.rows, query, k)
    }
}

/// Build a row from the split fields of one line.
///
/// Fields are `filename, link, id, description, embedding_model, vector`.
pub fn parse_row(fields: &[String], line: usize) -> Result<CatalogRow> {
    let [filename, link, id, description, embedding_model, vector] = fields else {
        return Err(CatalogError::ColumnCount {
            line,
            expected: COLUMN_COUNT,
            found: fields.len(),
        });
    };

    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| CatalogError::InvalidId {
            line,
            value: id.clone(),
        })?;

    let vector =
        parse_vector(vector).map_err(|source| CatalogError::InvalidVector { line, source })?;
    if vector.is_empty() {
        return Err(CatalogError::EmptyVector { line });
    }

    Ok(CatalogRow {
        filename: filename.trim().to_string(),
        link: link.trim().to_string(),
        id,
        description: description.trim().to_string(),
        embedding_model: embedding_model.trim().to_string(),
        vector,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const HEADER: &str = "filename,link,id,description,embedding_model,vector";

    fn load(text: &str) -> Result<Catalog> {
        Catalog::from_reader(text.as_bytes(), &LoadOptions::default())
    }

    #[test]
    fn test_load_rows() {
        let text = format!(
            "{HEADER}\n\
             a.jpg,https://x/a.jpg,1,\"Blue jeans, slim\",nomic-embed-text,\"[1.0, 0.0]\"\n\
             b.jpg,https://x/b.jpg,2,Red dress,nomic-embed-text,\"[0.0, 1.0]\"\n"
        );
        let catalog = load(&text).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.dimension(), Some(2));
        let first = &catalog.rows()[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.description, "Blue jeans, slim");
        assert_eq!(first.vector, vec![1.0, 0.0]);
        assert_eq!(
            catalog.model_tags().into_iter().collect::<Vec<_>>(),
            vec!["nomic-embed-text"]
        );
    }

    #[test]
    fn test_header_only() {
        assert!(load(HEADER).unwrap().is_empty());
    }

    #[test]
    fn test_without_header() {
        let text = "a.jpg,https://x/a.jpg,1,desc,m,\"[1]\"";
        let catalog =
            Catalog::from_reader(text.as_bytes(), &LoadOptions::default().without_header())
                .unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = format!("{HEADER}\n\na.jpg,l,1,d,m,\"[1]\"\n\r\n");
        assert_eq!(load(&text).unwrap().len(), 1);
    }

    #[test]
    fn test_header_after_leading_blank_lines() {
        let text = format!("\n\r\n{HEADER}\na.jpg,l,1,d,m,\"[1]\"\n");
        let catalog = load(&text).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.rows()[0].id, 1);
    }

    #[test]
    fn test_non_numeric_id() {
        let text = format!("{HEADER}\na.jpg,l,abc,d,m,\"[1]\"");
        assert!(matches!(
            load(&text),
            Err(CatalogError::InvalidId { line: 2, .. })
        ));
    }

    #[test]
    fn test_wrong_column_count() {
        let text = format!("{HEADER}\na.jpg,l,1,d");
        assert!(matches!(
            load(&text),
            Err(CatalogError::ColumnCount {
                line: 2,
                expected: 6,
                found: 4
            })
        ));
    }

    #[test]
    fn test_bad_vector() {
        let text = format!("{HEADER}\na.jpg,l,1,d,m,\"[1, x]\"");
        assert!(matches!(
            load(&text),
            Err(CatalogError::InvalidVector { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_vector() {
        let text = format!("{HEADER}\na.jpg,l,1,d,m,[]");
        assert!(matches!(
            load(&text),
            Err(CatalogError::EmptyVector { line: 2 })
        ));
    }

    #[test]
    fn test_inconsistent_dimension() {
        let text = format!("{HEADER}\na.jpg,l,1,d,m,\"[1, 2]\"\nb.jpg,l,2,d,m,\"[1]\"");
        assert!(matches!(
            load(&text),
            Err(CatalogError::InconsistentDimension {
                line: 3,
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "a.jpg,l,7,d,m,\"[0.5, 0.5]\"").unwrap();
        writeln!(file, "b.jpg,l,8,d,m,\"[1.0, -1.0]\"").unwrap();

        let catalog = Catalog::from_path(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(catalog.source(), Some(file.path()));

        let results = catalog.top_k(&[1.0, 0.0], 10).unwrap();
        let ids: Vec<i64> = results.iter().map(|r| r.row.id).collect();
        assert_eq!(ids, vec![8, 7]);
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::from_path("/definitely/not/here.csv", &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
