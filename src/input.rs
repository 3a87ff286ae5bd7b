use std::fs::File;
use std::io::{BufRead, BufReader};

use camino::Utf8Path;
use flate2::read::MultiGzDecoder;

use crate::error::MolpropError;

/// Opens a molecule list, gunzipping it when the name ends in `.gz`.
pub fn open_molecules(path: &Utf8Path) -> Result<Box<dyn BufRead>, MolpropError> {
    if !path.is_file() {
        return Err(MolpropError::InputNotFound(path.to_string()));
    }
    let file = File::open(path).map_err(|err| MolpropError::InputRead(format!("{path}: {err}")))?;
    if path.extension() == Some("gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
