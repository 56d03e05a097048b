use prosim::Discipline;
use serde::{Deserialize, Serialize};

/// Scenario parameters for the teller-line simulation. Times are in
/// minutes of simulated bank time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankConfig {
    /// Number of tellers working the lobby.
    pub tellers: usize,
    /// Waiting-room capacity; arrivals beyond it balk.
    pub lobby_capacity: usize,
    /// Order in which waiting customers are called up.
    pub discipline: Discipline,
    /// Customers to generate over the day.
    pub customers: u64,
    /// Mean exponential inter-arrival gap.
    pub mean_interarrival: f64,
    /// Uniform service-time range.
    pub service_low: f64,
    pub service_high: f64,
    /// Idle tellers re-check the lobby this often.
    pub poll_interval: f64,
    /// Doors close at this time; pending work is abandoned.
    pub closing_time: f64,
    /// Base RNG seed; tellers offset from it.
    pub seed: u64,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            tellers: 3,
            lobby_capacity: 8,
            discipline: Discipline::Fcfs,
            customers: 200,
            mean_interarrival: 2.0,
            service_low: 3.0,
            service_high: 9.0,
            poll_interval: 0.25,
            closing_time: 480.0,
            seed: 20240,
        }
    }
}
