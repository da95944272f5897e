use serde::Serialize;

use crate::models::StockPrediction;

/// Trim and uppercase user input. `None` for blank input.
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() { None } else { Some(ticker) }
}

/// What the search box shows. Independent of every group cache.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub result: Option<StockPrediction>,
    pub error: Option<String>,
}

/// Search state plus the bookkeeping that keeps an older in-flight search
/// from overwriting a newer one (or a clear).
#[derive(Debug, Default)]
pub struct SearchRecord {
    state: SearchState,
    issued: u64,
}

impl SearchRecord {
    pub fn begin(&mut self, query: &str) -> u64 {
        self.issued += 1;
        self.state = SearchState {
            query: query.to_string(),
            result: None,
            error: None,
        };
        self.issued
    }

    pub fn complete(&mut self, ticket: u64, prediction: StockPrediction) -> bool {
        if ticket != self.issued {
            return false;
        }
        self.state.result = Some(prediction);
        self.state.error = None;
        true
    }

    pub fn fail(&mut self, ticket: u64, message: String) -> bool {
        if ticket != self.issued {
            return false;
        }
        self.state.result = None;
        self.state.error = Some(message);
        true
    }

    pub fn clear(&mut self) {
        // Bumping the ticket orphans any search still in flight
        self.issued += 1;
        self.state = SearchState::default();
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }
}
