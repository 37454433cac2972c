//! Console report.

use montepi_core::{PiEstimate, REFERENCE_PI};

/// Banner printed before anything runs.
pub fn header(n_points: u64) -> String {
    format!(
        concat!(
            "\n",
            "Monte Carlo pi Calculation Simulation\n",
            "Device Api\n",
            "-------------------------------------\n",
            "Number of points = {}\n",
        ),
        n_points
    )
}

/// Result block printed after a successful estimate.
pub fn results(estimate: &PiEstimate) -> String {
    format!(
        concat!(
            "Estimated value of Pi = {}\n",
            "Exact value of Pi = {}\n",
            "Absolute error = {}\n",
            "\n",
        ),
        estimate.estimated_pi,
        REFERENCE_PI,
        estimate.absolute_error()
    )
}
