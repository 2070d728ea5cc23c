//! Capture source
//!
//! Seam for whatever produces flows (browser bridge, pcap, mock).
//! The core only drains flows between `start` and `stop`.

use crate::logic::exposure::Flow;
use crate::logic::simulation;
use super::types::CaptureError;

pub trait CaptureSource: Send {
    fn name(&self) -> &str;
    fn start(&mut self) -> Result<(), CaptureError>;
    fn stop(&mut self) -> Result<(), CaptureError>;
    /// Flows captured since the last drain
    fn drain_flows(&mut self) -> Vec<Flow>;
}

/// Replays a fixed list of flows
#[derive(Debug, Default)]
pub struct MockCapture {
    flows: Vec<Flow>,
    running: bool,
}

impl MockCapture {
    pub fn new(flows: Vec<Flow>) -> Self {
        Self { flows, running: false }
    }

    /// Canned flows from the simulation datasets
    pub fn simulated() -> Self {
        Self::new(simulation::mock_flows())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl CaptureSource for MockCapture {
    fn name(&self) -> &str {
        "mock"
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        if self.running {
            return Err(CaptureError::Source("mock capture already running".into()));
        }
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        if !self.running {
            return Err(CaptureError::Source("mock capture not running".into()));
        }
        self.running = false;
        Ok(())
    }

    fn drain_flows(&mut self) -> Vec<Flow> {
        if !self.running {
            return Vec::new();
        }
        std::mem::take(&mut self.flows)
    }
}
