use crate::error::RenderError;
use crate::twitter_message::SearchBatch;
use serde_json::Value;
use std::io::Read;

/// Parse the JSON body of one search response into a [`SearchBatch`].
/// Expected shape:
/// { "results": [ { "text": ..., "from_user": ..., "id": ..., "created_at": ... }, ... ] }
///
/// Only the envelope is validated here; individual records are checked when rendered.
pub fn parse_search_results(json: &str) -> Result<SearchBatch, RenderError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| RenderError::MalformedInput(format!("search response is not JSON: {}", e)))?;
    batch_from_value(value)
}

/// Same as [`parse_search_results`], reading the body from a file or stdin.
pub fn parse_search_results_reader<R: Read>(reader: R) -> Result<SearchBatch, RenderError> {
    let value: Value = serde_json::from_reader(reader)
        .map_err(|e| RenderError::MalformedInput(format!("search response is not JSON: {}", e)))?;
    batch_from_value(value)
}

fn batch_from_value(value: Value) -> Result<SearchBatch, RenderError> {
    let Value::Object(mut envelope) = value else {
        return Err(RenderError::MalformedInput(
            "search response is not an object".to_string(),
        ));
    };

    match envelope.remove("results") {
        Some(Value::Array(results)) => Ok(SearchBatch { results }),
        Some(_) => Err(RenderError::MalformedInput(
            "`results` is not an array".to_string(),
        )),
        None => Err(RenderError::MalformedInput(
            "search response has no `results`".to_string(),
        )),
    }
}
