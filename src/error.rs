use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum MolpropError {
    #[error("empty input line")]
    EmptyInputLine,

    #[error("invalid property selection: {0}")]
    #[diagnostic(help("use comma-separated numbers from the property list, names, or 'a' for all"))]
    InvalidPropertySelection(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to read input: {0}")]
    InputRead(String),

    #[error("failed to write report: {0}")]
    ReportWrite(String),

    #[error("input file not found: {0}")]
    InputNotFound(String),

    #[error("prompt input closed before a value was given")]
    PromptClosed,

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("failed to install interrupt handler: {0}")]
    InterruptHandler(String),

    #[error("PubChem request failed: {0}")]
    PubchemHttp(String),

    #[error("PubChem returned status {status}: {message}")]
    PubchemStatus { status: u16, message: String },

    #[error("no PubChem compound matches structure {0}")]
    CompoundNotFound(String),

    #[error("malformed PubChem record: {0}")]
    MalformedRecord(String),

    #[error("property {property} is not available for CID {cid}")]
    MissingProperty { property: String, cid: u64 },
}
