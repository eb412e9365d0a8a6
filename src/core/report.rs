/*
 * Machine-readable summary of a search for the `--json` output mode. The
 * report echoes the request it was produced from next to the result so a
 * saved report is self-describing.
 */
use super::models::{SearchRequest, SearchResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SearchReport<'a> {
    pub request: &'a SearchRequest,
    #[serde(flatten)]
    pub result: &'a SearchResult,
}

pub fn to_json(request: &SearchRequest, result: &SearchResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&SearchReport { request, result })
}
