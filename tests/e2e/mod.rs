// End-to-end tests for the Newsie Backend API
//
// Each test gets its own application server bound to 127.0.0.1:0 and its own
// mock NewsAPI server, so tests run in parallel without sharing state.
//
// Architecture:
// - Mock NewsAPI (axum) serving a controllable top-headlines reply
// - Real NewsApiRepository pointed at the mock, with the fetch cache enabled
// - Deterministic lexicon scorer, classifier and keyword extractor

mod helpers;
mod test_refresh;
