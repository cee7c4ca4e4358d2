//! Iteration and timing counters of the equilibrium solver.
//!
//! [`SolveCounters`] keeps two sets of numbers: those of the current call and
//! the running totals over the solver's lifetime. The solver records into the
//! per-call set and folds it into the totals with
//! [`SolveCounters::finish_call`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use equilib::counters::{report_counters, SolveCounters};
//! use equilib::sink::BufferSink;
//!
//! let mut counters = SolveCounters::new();
//! counters.record_initial_estimate(Duration::from_millis(2));
//! counters.record_basis_opt(Duration::from_millis(5));
//! counters.record_iterations(12, Duration::from_millis(40));
//! counters.finish_call(Duration::from_millis(50));
//!
//! let mut sink = BufferSink::new();
//! report_counters(false, &counters, &mut sink);
//! assert!(sink.contains("NA"));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::format::sci;
use crate::sink::ReportSink;

/// Printed in place of a time when timing output is disabled.
pub const NOT_MEASURED: &str = "    NA     ";

/// Counters of a single solver call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallCounters {
    pub basis_optimizations: u32,
    pub basis_time: Duration,
    /// Main iteration count
    pub iterations: u32,
    /// Time spent in the main iteration
    pub solve_time: Duration,
}

/// Counters accumulated over every solver call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativeCounters {
    pub basis_optimizations: u32,
    pub basis_time: Duration,
    /// Number of completed calls to the main iteration
    pub solve_calls: u32,
    pub iterations: u32,
    pub solve_time: Duration,
    pub initial_estimates: u32,
    pub initial_estimate_time: Duration,
    /// Wall time of all calls, everything included
    pub total_time: Duration,
}

/// Per-call and lifetime counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveCounters {
    pub call: CallCounters,
    pub total: CumulativeCounters,
}

impl SolveCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one basis optimisation.
    pub fn record_basis_opt(&mut self, elapsed: Duration) {
        self.call.basis_optimizations += 1;
        self.call.basis_time += elapsed;
    }

    /// Records main-loop iterations.
    pub fn record_iterations(&mut self, iterations: u32, elapsed: Duration) {
        self.call.iterations += iterations;
        self.call.solve_time += elapsed;
    }

    /// Records one initial-estimate computation. These go straight to the totals.
    pub fn record_initial_estimate(&mut self, elapsed: Duration) {
        self.total.initial_estimates += 1;
        self.total.initial_estimate_time += elapsed;
    }

    /// Folds the current call into the totals and starts a fresh call.
    pub fn finish_call(&mut self, elapsed: Duration) {
        let call = std::mem::take(&mut self.call);
        self.total.basis_optimizations += call.basis_optimizations;
        self.total.basis_time += call.basis_time;
        self.total.iterations += call.iterations;
        self.total.solve_time += call.solve_time;
        self.total.solve_calls += 1;
        self.total.total_time += elapsed;
    }
}

fn seconds(time: Duration, timing: bool) -> String {
    if timing {
        sci(time.as_secs_f64(), 11, 5)
    } else {
        NOT_MEASURED.to_string()
    }
}

/// Renders the counters of the current call.
pub fn report_call_counters<S: ReportSink + ?Sized>(timing: bool, counters: &SolveCounters, sink: &mut S) {
    let call = &counters.call;
    sink.line("Counters:         Iterations          Time (seconds)");
    sink.line(&format!(
        "    basis_opt:    {:>5}             {}",
        call.basis_optimizations,
        seconds(call.basis_time, timing)
    ));
    sink.line(&format!("    solve_TP:     {:>5}             {}", call.iterations, seconds(call.solve_time, timing)));
}

/// Renders the lifetime counters.
pub fn report_counters<S: ReportSink + ?Sized>(timing: bool, counters: &SolveCounters, sink: &mut S) {
    let total = &counters.total;
    sink.blank();
    sink.line("TCounters:   Num_Calls   Total_Its       Total_Time (seconds)");
    sink.line(&format!(
        "    basis_opt:    {:>5}                 {}",
        total.basis_optimizations,
        seconds(total.basis_time, timing)
    ));
    sink.line(&format!(
        "    solve_TP:     {:>5}      {:>5}      {}",
        total.solve_calls,
        total.iterations,
        seconds(total.solve_time, timing)
    ));
    sink.line(&format!(
        "    init_est:     {:>5}                 {}",
        total.initial_estimates,
        seconds(total.initial_estimate_time, timing)
    ));
    sink.line(&format!("    TotalTime:                            {}", seconds(total.total_time, timing)));
}
