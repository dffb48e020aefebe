//! JSON envelope rendering for stdout and stderr.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;
use crate::metadata::Metadata;

/// Payload slot of an envelope; the variant name becomes the JSON key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Data(Value),
    Stats(Value),
}

/// `{"coin_id": ..., "data"|"stats": ..., "meta": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_id: Option<String>,
    #[serde(flatten)]
    pub body: Body,
    pub meta: Metadata,
}

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    error: ErrorBody<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

pub fn render(envelope: &Envelope, pretty: bool) -> Result<(), CliError> {
    let rendered = to_json(envelope, pretty)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

/// Write the error report to stderr. Falls back to plain text if the report
/// itself cannot be serialized.
pub fn render_error(error: &CliError) {
    let report = ErrorReport {
        error: ErrorBody {
            code: error.code(),
            message: error.to_string(),
        },
    };
    match serde_json::to_string(&report) {
        Ok(rendered) => eprintln!("{rendered}"),
        Err(_) => eprintln!("error: {error}"),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
