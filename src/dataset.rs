//! Dataset loading.
//!
//! A dataset is a pre-parsed JSON document holding the root id, the branch
//! triples, and the alignment rows. Conversion from tree/alignment source
//! formats (Newick, Stockholm, FASTA) happens upstream of this program.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use serde::Deserialize;
use thiserror::Error;

use crate::tree::Branch;

/// Node id to alignment row, rows stored as `Vec<char>` for O(1) cell access.
pub type RowData = HashMap<String, Vec<char>>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid dataset: {0}")]
    Json(#[from] serde_json::Error),
}

/// A loaded dataset, immutable once parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub root: String,
    pub branches: Vec<Branch>,
    #[serde(default, rename = "rowData")]
    pub row_data: HashMap<String, String>,
}

impl Dataset {
    /// Alignment rows as character vectors, keyed by node id.
    pub fn row_chars(&self) -> RowData {
        self.row_data
            .iter()
            .map(|(id, seq)| (id.clone(), seq.chars().collect()))
            .collect()
    }
}

/// Parse a dataset from a reader.
pub fn parse<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parse a dataset from a string.
pub fn parse_str(s: &str) -> Result<Dataset, DatasetError> {
    parse(s.as_bytes())
}

/// Load a dataset from a file path. `.gz` files are decompressed on the fly.
pub fn load_file(path: &Path) -> Result<Dataset, DatasetError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        parse(GzDecoder::new(file))
    } else {
        parse(file)
    }
}
