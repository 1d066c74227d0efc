//! Telemetry task: publishes the robot state at the reporting cadence.
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Ticker};
use log::{debug, warn};

use crate::robot::config::TELEMETRY_INTERVAL_MS;
use crate::robot::state::{RobotState, ROBOT_STATE};
use crate::TELEMETRY_CHANNEL_SIZE;

#[embassy_executor::task]
pub async fn telemetry_task(
    report_sender: Sender<'static, CriticalSectionRawMutex, RobotState, TELEMETRY_CHANNEL_SIZE>,
) {
    let mut ticker = Ticker::every(Duration::from_millis(TELEMETRY_INTERVAL_MS));
    loop {
        let report = ROBOT_STATE.lock(|state| *state.borrow());
        let faulted = report.faulted_legs();
        if faulted.is_empty() {
            debug!("[TELEMETRY_TASK] publishing report");
        } else {
            warn!("[TELEMETRY_TASK] {} leg(s) faulted", faulted.len());
        }
        // Reporting must never stall the control loop; drop when full.
        let _ = report_sender.try_send(report);
        ticker.next().await;
    }
}
