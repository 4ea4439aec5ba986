//! DynamoDB metadata store adapter
//!
//! Scans the metadata table one page per request. Items come back as JSON
//! objects, and DynamoDB's `LastEvaluatedKey` travels to the client as an
//! opaque page token.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::{DisplayErrorContext, ProvideErrorMetadata},
    primitives::Blob,
    types::AttributeValue,
    Client,
};
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, error, info};

use super::{MetadataStore, StoreError, StoreResult};
use crate::models::Page;
use crate::settings::MetadataStoreConfig;

/// Error code DynamoDB returns for an `ExclusiveStartKey` outside the key schema
const VALIDATION_EXCEPTION: &str = "ValidationException";

pub struct DynamoMetadataStore {
    client: Client,
    table_name: String,
}

impl DynamoMetadataStore {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    pub fn from_sdk_config(
        sdk_config: &aws_config::SdkConfig,
        config: &MetadataStoreConfig,
    ) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        info!("Initializing DynamoDB client for table: {}", config.table_name);
        Self::new(Client::from_conf(builder.build()), config.table_name.clone())
    }
}

#[async_trait]
impl MetadataStore for DynamoMetadataStore {
    async fn scan_items(&self, page_token: Option<String>) -> StoreResult<Page<Value>> {
        let start_key = page_token.as_deref().map(decode_start_key).transpose()?;
        let continued = start_key.is_some();
        debug!(
            "Scanning metadata table {} (continued: {})",
            self.table_name, continued
        );

        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .set_exclusive_start_key(start_key)
            .send()
            .await
            .map_err(|e| {
                let rejected_token = continued
                    && e.as_service_error().and_then(|se| se.code()) == Some(VALIDATION_EXCEPTION);
                if rejected_token {
                    return StoreError::InvalidPageToken("start key rejected by DynamoDB".to_string());
                }

                error!("DynamoDB scan failed for table {}: {}", self.table_name, DisplayErrorContext(&e));
                StoreError::MetadataStore(format!("failed to scan {}: {}", self.table_name, e))
            })?;

        let items = output.items().iter().map(item_to_json).collect();
        let next_page_token = output
            .last_evaluated_key()
            .filter(|key| !key.is_empty())
            .map(encode_start_key)
            .transpose()?;

        Ok(Page::new(items, next_page_token))
    }
}

/// Render a DynamoDB item as a JSON object
pub fn item_to_json(item: &HashMap<String, AttributeValue>) -> Value {
    let object: Map<String, Value> = item
        .iter()
        .map(|(name, value)| (name.clone(), attribute_to_json(value)))
        .collect();
    Value::Object(object)
}

/// Render one attribute value as plain JSON.
///
/// Binary values become standard base64 strings. Numbers that JSON cannot
/// hold exactly stay strings.
pub fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number_to_json(n),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::B(blob) => Value::String(STANDARD.encode(blob.as_ref())),
        AttributeValue::M(map) => item_to_json(map),
        AttributeValue::L(list) => Value::Array(list.iter().map(attribute_to_json).collect()),
        AttributeValue::Ss(set) => Value::Array(set.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(set) => {
            Value::Array(set.iter().map(String::as_str).map(number_to_json).collect())
        }
        AttributeValue::Bs(set) => Value::Array(
            set.iter()
                .map(|blob| Value::String(STANDARD.encode(blob.as_ref())))
                .collect(),
        ),
        _ => Value::Null,
    }
}

fn number_to_json(n: &str) -> Value {
    if let Ok(int) = n.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(uint) = n.parse::<u64>() {
        return Value::Number(uint.into());
    }

    // DynamoDB keeps up to 38 significant digits; an f64 only counts if it
    // renders back to the same decimal value.
    let exact = decimal_parts(n);
    n.parse::<f64>()
        .ok()
        .filter(|float| exact.is_some() && decimal_parts(&float.to_string()) == exact)
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(n.to_string()))
}

/// Split a decimal literal into sign, significant digits and the power of ten
/// of the last significant digit. Zero normalizes to `(false, "", 0)`.
fn decimal_parts(literal: &str) -> Option<(bool, String, i64)> {
    let (negative, unsigned) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, literal.strip_prefix('+').unwrap_or(literal)),
    };

    let (mantissa, exponent) = match unsigned.find(|c| c == 'e' || c == 'E') {
        Some(at) => (&unsigned[..at], unsigned[at + 1..].parse::<i64>().ok()?),
        None => (unsigned, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let digits = format!("{}{}", int_part, frac_part);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let without_trailing = digits.trim_end_matches('0');
    let significant = without_trailing.trim_start_matches('0');
    if significant.is_empty() {
        return Some((false, String::new(), 0));
    }

    let scale = exponent - frac_part.len() as i64 + (digits.len() - without_trailing.len()) as i64;
    Some((negative, significant.to_string(), scale))
}

/// Key attributes as they appear inside a page token. Table keys can only be
/// strings, numbers or binary.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum KeyAttribute {
    S(String),
    N(String),
    B(String),
}

/// Encode a `LastEvaluatedKey` as a URL-safe page token
pub fn encode_start_key(key: &HashMap<String, AttributeValue>) -> StoreResult<String> {
    let mut encoded = BTreeMap::new();

    for (name, value) in key {
        let attribute = match value {
            AttributeValue::S(s) => KeyAttribute::S(s.clone()),
            AttributeValue::N(n) => KeyAttribute::N(n.clone()),
            AttributeValue::B(blob) => KeyAttribute::B(STANDARD.encode(blob.as_ref())),
            other => {
                return Err(StoreError::MetadataStore(format!(
                    "unsupported key attribute {}: {:?}",
                    name, other
                )))
            }
        };
        encoded.insert(name.clone(), attribute);
    }

    let json = serde_json::to_vec(&encoded)
        .map_err(|e| StoreError::MetadataStore(format!("failed to encode page token: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a page token back into an `ExclusiveStartKey`
pub fn decode_start_key(token: &str) -> StoreResult<HashMap<String, AttributeValue>> {
    let json = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| StoreError::InvalidPageToken(e.to_string()))?;
    let decoded: BTreeMap<String, KeyAttribute> = serde_json::from_slice(&json)
        .map_err(|e| StoreError::InvalidPageToken(e.to_string()))?;

    if decoded.is_empty() {
        return Err(StoreError::InvalidPageToken("token carries no key attributes".to_string()));
    }

    decoded
        .into_iter()
        .map(|(name, attribute)| -> StoreResult<(String, AttributeValue)> {
            let value = match attribute {
                KeyAttribute::S(s) => AttributeValue::S(s),
                KeyAttribute::N(n) => AttributeValue::N(n),
                KeyAttribute::B(b) => AttributeValue::B(Blob::new(
                    STANDARD
                        .decode(b)
                        .map_err(|e| StoreError::InvalidPageToken(e.to_string()))?,
                )),
            };
            Ok((name, value))
        })
        .collect()
}
