use std::io::{BufRead, Write};

use camino::{Utf8Path, Utf8PathBuf};

use crate::catalog::{PropertyCatalog, PropertySelection};
use crate::error::MolpropError;
use crate::style::{RED, paint};

const QUIT_TOKEN: &str = "q";

/// Asks for the molecule file until an existing file is named. `q` or end of input gives `None`.
pub fn ask_input_path<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    color: bool,
) -> Result<Option<Utf8PathBuf>, MolpropError> {
    write_out(
        output,
        "Please provide the full path to the file containing the molecules in smiles format:\nEnter path: ",
    )?;
    loop {
        let Some(answer) = read_answer(input)? else {
            return Ok(None);
        };
        if answer == QUIT_TOKEN {
            return Ok(None);
        }
        let path = Utf8Path::new(&answer);
        if path.is_file() {
            return Ok(Some(path.to_path_buf()));
        }
        write_out(
            output,
            &format!(
                "\n{}\nPlease provide the correct path to the smiles file (or type 'q' to quit):\nEnter path: ",
                paint(color, RED, "***NO SUCH FILE***")
            ),
        )?;
    }
}

/// Lists the catalog and asks for a selection until one parses.
pub fn ask_properties<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    color: bool,
) -> Result<PropertySelection, MolpropError> {
    let mut listing = String::from("\nList of available properties:\n");
    for (index, name) in PropertyCatalog::all() {
        listing.push_str(&format!("\t{index}\t{name}\n"));
    }
    listing.push_str(
        "\nChoose the properties to include in the report (separated by commas):\nExample: 7,18,21  (or type 'a' for all)\n\nEnter properties: ",
    );
    write_out(output, &listing)?;

    loop {
        let answer = read_answer(input)?.ok_or(MolpropError::PromptClosed)?;
        match PropertySelection::parse(&answer) {
            Ok(selection) => return Ok(selection),
            Err(err) => {
                tracing::debug!(%err, "rejected property selection");
                write_out(
                    output,
                    &format!(
                        "\n{}\nPlease select valid property numbers separated by commas (example: 2,11,29):\nEnter properties: ",
                        paint(color, RED, "***INVALID INPUT***")
                    ),
                )?;
            }
        }
    }
}

fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>, MolpropError> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|err| MolpropError::Terminal(err.to_string()))?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn write_out<W: Write>(output: &mut W, text: &str) -> Result<(), MolpropError> {
    output
        .write_all(text.as_bytes())
        .and_then(|_| output.flush())
        .map_err(|err| MolpropError::Terminal(err.to_string()))
}
