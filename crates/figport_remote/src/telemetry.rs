//! Simulation-control telemetry client.
//!
//! Drives the suit-telemetry simulation service with plain GETs and logs the
//! outcome of each call. Failures are reported, never retried.

use std::fmt;
use std::time::Duration;

use crate::build_agent;
use crate::settings::RemoteSettings;

const SIM_START: &str = "/simulationcontrol/sim/1/start";
const SIM_STOP: &str = "/simulationcontrol/sim/1/stop";
const SIM_PAUSE: &str = "/simulationcontrol/sim/1/pause";
const SIM_STATE: &str = "/simulationstate/1";

/// Result of one telemetry request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelemetryOutcome {
    /// The server could not be reached
    ConnectionError(String),
    /// The response body could not be read
    DataProcessingError(String),
    /// The server answered with a non-success status
    ProtocolError(u16),
    Success(String),
}

impl TelemetryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TelemetryOutcome::Success(_))
    }

    /// Body of a successful response.
    pub fn body(&self) -> Option<&str> {
        match self {
            TelemetryOutcome::Success(body) => Some(body),
            _ => None,
        }
    }

    fn from_response(result: Result<ureq::Response, ureq::Error>) -> Self {
        match result {
            Ok(response) => match response.into_string() {
                Ok(body) => TelemetryOutcome::Success(body),
                Err(e) => TelemetryOutcome::DataProcessingError(e.to_string()),
            },
            Err(ureq::Error::Status(status, _)) => TelemetryOutcome::ProtocolError(status),
            Err(ureq::Error::Transport(transport)) => TelemetryOutcome::ConnectionError(transport.to_string()),
        }
    }

    fn log(&self, path: &str) {
        match self {
            TelemetryOutcome::Success(_) => log::info!("{}: {}", path, self),
            _ => log::warn!("{}: {}", path, self),
        }
    }
}

impl fmt::Display for TelemetryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryOutcome::ConnectionError(message) => write!(f, "Connection Error ({message})"),
            TelemetryOutcome::DataProcessingError(message) => write!(f, "Data Processing Error ({message})"),
            TelemetryOutcome::ProtocolError(status) => write!(f, "Protocol Error (HTTP {status})"),
            TelemetryOutcome::Success(body) => write!(f, "Success {body}"),
        }
    }
}

/// Blocking client for the simulation-control endpoints.
pub struct TelemetryClient {
    agent: ureq::Agent,
    base_uri: String,
}

impl TelemetryClient {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self::with_timeout(base_uri, None)
    }

    pub fn with_timeout(base_uri: impl Into<String>, timeout: Option<Duration>) -> Self {
        let base_uri: String = base_uri.into();
        Self {
            agent: build_agent(timeout),
            base_uri: base_uri.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &RemoteSettings) -> Self {
        Self::with_timeout(settings.telemetry_base_uri.clone(), settings.timeout())
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Restart the simulation: stop it, then start it. Returns the outcome
    /// of the start request; the stop outcome is only logged.
    pub fn start_sim(&self) -> TelemetryOutcome {
        self.get(SIM_STOP);
        self.get(SIM_START)
    }

    pub fn stop_sim(&self) -> TelemetryOutcome {
        self.get(SIM_STOP)
    }

    pub fn pause_sim(&self) -> TelemetryOutcome {
        self.get(SIM_PAUSE)
    }

    /// Current simulation state; the body is passed through unparsed.
    pub fn sim_state(&self) -> TelemetryOutcome {
        self.get(SIM_STATE)
    }

    /// Request the state `count` times, `interval` apart, handing each
    /// outcome to `on_state`. Failures do not stop the loop.
    pub fn poll_state<F>(&self, interval: Duration, count: usize, mut on_state: F)
    where
        F: FnMut(usize, &TelemetryOutcome),
    {
        for i in 0..count {
            if i > 0 {
                std::thread::sleep(interval);
            }
            let outcome = self.sim_state();
            on_state(i, &outcome);
        }
    }

    fn get(&self, path: &str) -> TelemetryOutcome {
        let url = format!("{}{}", self.base_uri, path);
        let outcome = TelemetryOutcome::from_response(self.agent.get(&url).call());
        outcome.log(path);
        outcome
    }
}
