use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::catalog::{PropertyDef, PropertySource};
use crate::error::MolpropError;

pub const DEFAULT_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubchemSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: usize,
}

impl Default for PubchemSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

/// A resolved PubChem compound: CID, synonyms, and the raw record(s) its properties are read from.
#[derive(Debug, Clone)]
pub struct CompoundRecord {
    cid: u64,
    synonyms: Vec<String>,
    record: Value,
    conformer: Option<Value>,
}

impl CompoundRecord {
    pub fn from_records(
        record: Value,
        synonyms: Vec<String>,
        conformer: Option<Value>,
    ) -> Result<Self, MolpropError> {
        let cid = record_cid(&record)
            .ok_or_else(|| MolpropError::MalformedRecord("record has no CID".to_string()))?;
        Ok(Self {
            cid,
            synonyms,
            record,
            conformer,
        })
    }

    pub fn cid(&self) -> u64 {
        self.cid
    }

    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }

    /// Rendered value of a catalog property, or `None` when the record does not carry it.
    pub fn property(&self, def: &PropertyDef) -> Option<String> {
        let record = if def.conformer {
            self.conformer.as_ref()?
        } else {
            &self.record
        };
        match def.source {
            PropertySource::Prop { label, names } => {
                find_prop(record, label, names).and_then(render_prop_value)
            }
            PropertySource::Count(field) => record
                .get("count")
                .and_then(|v| v.get(field))
                .and_then(render_value),
            PropertySource::Charge => record.get("charge").and_then(render_value),
            PropertySource::CoordinateType => record
                .get("coords")
                .and_then(|v| v.as_array())
                .and_then(|arr| arr.first())
                .and_then(|v| v.get("type"))
                .and_then(|v| v.as_array())
                .and_then(|arr| arr.first())
                .and_then(|v| v.as_u64())
                .and_then(coordinate_type_name)
                .map(|name| name.to_string()),
        }
    }
}

pub trait CompoundClient: Send + Sync {
    fn lookup(&self, structure: &str) -> Result<CompoundRecord, MolpropError>;
}

#[derive(Clone)]
pub struct PubchemHttpClient {
    client: Client,
    settings: PubchemSettings,
    conformer: bool,
}

impl PubchemHttpClient {
    pub fn new(settings: &PubchemSettings) -> Result<Self, MolpropError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("molprop/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| MolpropError::PubchemHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|err| MolpropError::PubchemHttp(err.to_string()))?;
        Ok(Self {
            client,
            settings: settings.clone(),
            conformer: false,
        })
    }

    /// Also download the 3D conformer record for every compound.
    pub fn with_conformer(mut self, conformer: bool) -> Self {
        self.conformer = conformer;
        self
    }

    fn compound_url(&self) -> String {
        format!("{}/compound/smiles/JSON", self.base())
    }

    fn synonyms_url(&self, cid: u64) -> String {
        format!("{}/compound/cid/{cid}/synonyms/JSON", self.base())
    }

    fn conformer_url(&self, cid: u64) -> String {
        format!("{}/compound/cid/{cid}/record/JSON?record_type=3d", self.base())
    }

    fn base(&self) -> &str {
        self.settings.base_url.trim_end_matches('/')
    }

    fn send_with_retries<F>(&self, mut make_req: F) -> Result<Response, MolpropError>
    where
        F: FnMut() -> RequestBuilder,
    {
        const BASE_DELAY_MS: u64 = 200;
        let max_retries = self.settings.max_retries;
        let mut attempt = 0usize;
        loop {
            match make_req().send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if attempt < max_retries && is_retryable_status(status) {
                        tracing::debug!(status, attempt, "PubChem busy, retrying");
                        thread::sleep(Duration::from_millis(BASE_DELAY_MS * (attempt as u64 + 1)));
                        attempt += 1;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(err) => {
                    if attempt < max_retries && is_retryable_error(&err) {
                        tracing::debug!(error = %err, attempt, "PubChem request failed, retrying");
                        thread::sleep(Duration::from_millis(BASE_DELAY_MS * (attempt as u64 + 1)));
                        attempt += 1;
                        continue;
                    }
                    return Err(MolpropError::PubchemHttp(err.to_string()));
                }
            }
        }
    }

    /// `None` when PubChem answers 404 (its "no such record" fault).
    fn fetch_json<F>(&self, make_req: F) -> Result<Option<Value>, MolpropError>
    where
        F: FnMut() -> RequestBuilder,
    {
        let response = self.send_with_retries(make_req)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::handle_status(response)?;
        let value = response
            .json()
            .map_err(|err| MolpropError::PubchemHttp(err.to_string()))?;
        Ok(Some(value))
    }

    fn handle_status(response: Response) -> Result<Response, MolpropError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "PubChem request failed".to_string());
        Err(MolpropError::PubchemStatus { status, message })
    }
}

impl CompoundClient for PubchemHttpClient {
    fn lookup(&self, structure: &str) -> Result<CompoundRecord, MolpropError> {
        let url = self.compound_url();
        let not_found = || MolpropError::CompoundNotFound(structure.to_string());

        let response = self
            .fetch_json(|| self.client.post(&url).form(&[("smiles", structure)]))?
            .ok_or_else(not_found)?;
        let record = first_compound(&response)?;
        let cid = record_cid(&record).ok_or_else(not_found)?;

        let synonyms_url = self.synonyms_url(cid);
        let synonyms = self
            .fetch_json(|| self.client.get(&synonyms_url))?
            .map(|value| parse_synonyms(&value))
            .unwrap_or_default();

        let conformer = if self.conformer {
            let conformer_url = self.conformer_url(cid);
            self.fetch_json(|| self.client.get(&conformer_url))?
                .map(|value| first_compound(&value))
                .transpose()?
        } else {
            None
        };

        CompoundRecord::from_records(record, synonyms, conformer)
    }
}

/// First entry of a `PC_Compounds` response.
pub fn first_compound(response: &Value) -> Result<Value, MolpropError> {
    response
        .get("PC_Compounds")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .cloned()
        .ok_or_else(|| MolpropError::MalformedRecord("response has no PC_Compounds".to_string()))
}

/// CID of a compound record. PubChem answers unknown structures with a record without one.
pub fn record_cid(record: &Value) -> Option<u64> {
    record
        .get("id")
        .and_then(|v| v.get("id"))
        .and_then(|v| v.get("cid"))
        .and_then(|v| v.as_u64())
        .filter(|cid| *cid > 0)
}

pub fn parse_synonyms(response: &Value) -> Vec<String> {
    response
        .get("InformationList")
        .and_then(|v| v.get("Information"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|v| v.get("Synonym"))
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(|v| v.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn find_prop<'a>(record: &'a Value, label: &str, names: &[&str]) -> Option<&'a Value> {
    record
        .get("props")
        .and_then(|v| v.as_array())?
        .iter()
        .find(|prop| {
            let urn = prop.get("urn");
            let prop_label = urn.and_then(|u| u.get("label")).and_then(|v| v.as_str());
            let prop_name = urn.and_then(|u| u.get("name")).and_then(|v| v.as_str());
            prop_label == Some(label)
                && (names.is_empty() || prop_name.is_some_and(|name| names.contains(&name)))
        })
        .and_then(|prop| prop.get("value"))
}

fn render_prop_value(value: &Value) -> Option<String> {
    let obj = value.as_object()?;
    if let Some(fval) = obj.get("fval").and_then(|v| v.as_f64()) {
        return Some(format!("{fval:?}"));
    }
    if let Some(fvec) = obj.get("fvec").and_then(|v| v.as_array()) {
        let items = fvec
            .iter()
            .filter_map(|v| v.as_f64())
            .map(|v| format!("{v:?}"))
            .collect::<Vec<_>>();
        return Some(format!("[{}]", items.join(", ")));
    }
    ["sval", "ival", "binary", "slist", "ivec"]
        .iter()
        .find_map(|key| obj.get(*key))
        .and_then(render_value)
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| format!("{f:?}"))
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let items = items.iter().filter_map(render_value).collect::<Vec<_>>();
            Some(format!("[{}]", items.join(", ")))
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn coordinate_type_name(code: u64) -> Option<&'static str> {
    let name = match code {
        1 => "twod",
        2 => "threed",
        3 => "submitted",
        4 => "experimental",
        5 => "computed",
        6 => "standardized",
        7 => "augmented",
        8 => "aligned",
        9 => "compact",
        10 => "units_angstroms",
        11 => "units_nanometers",
        12 => "units_pixel",
        13 => "units_points",
        14 => "units_stdbonds",
        255 => "units_unknown",
        _ => return None,
    };
    Some(name)
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
