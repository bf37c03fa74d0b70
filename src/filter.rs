//! Dropping records that produced no HTML.

use crate::extractor::ExtractionResult;

/// Whether `result` should reach the sink.
#[must_use]
pub fn keep(result: &ExtractionResult) -> bool {
    result.is_extracted()
}

/// Pairs of the extracted results, in input order.
pub fn extracted_pairs<I>(results: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = ExtractionResult>,
{
    results.into_iter().filter_map(ExtractionResult::into_pair)
}
