use std::time::Duration;

use kakuro_core::{SolveError, SolveRequest, SolveResponse, Solver};
use tracing::debug;

/// Blocking HTTP adapter for the solver service.
///
/// One request at a time; the app blocks on the exchange, which also
/// keeps a second solve from starting while one is outstanding.
pub struct HttpSolver {
    agent: ureq::Agent,
    url: String,
}

impl HttpSolver {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(60))
                .build(),
            url: url.into(),
        }
    }
}

impl Solver for HttpSolver {
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolveError> {
        debug!(url = %self.url, "posting solve request");
        let response = self
            .agent
            .post(&self.url)
            .send_json(request)
            .map_err(|err| match err {
                ureq::Error::Status(code, response) => {
                    let body = response.into_string().unwrap_or_default();
                    SolveError::Transport(format!("HTTP {}: {}", code, body.trim()))
                }
                ureq::Error::Transport(transport) => SolveError::Transport(transport.to_string()),
            })?;
        response
            .into_json::<SolveResponse>()
            .map_err(|err| SolveError::Decode(err.to_string()))
    }
}
