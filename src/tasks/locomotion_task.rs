//! Servo-update task: ticks the locomotion engine at the servo cadence.
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use log::info;

use crate::engine::pose::BodyPose;
use crate::engine::LocomotionEngine;
use crate::robot::commands::{MotionCommand, ServoFrame};
use crate::robot::config::{RobotConfig, SERVO_INTERVAL_MS};
use crate::robot::state::ROBOT_STATE;
use crate::{COMMAND_CHANNEL_SIZE, FRAME_CHANNEL_SIZE};

/// Latest commanded body pose, written by the input collaborator.
pub static BODY_POSE: Signal<CriticalSectionRawMutex, BodyPose> = Signal::new();

#[embassy_executor::task]
pub async fn locomotion_task(
    command_receiver: Receiver<
        'static,
        CriticalSectionRawMutex,
        MotionCommand,
        COMMAND_CHANNEL_SIZE,
    >,
    frame_sender: Sender<'static, CriticalSectionRawMutex, ServoFrame, FRAME_CHANNEL_SIZE>,
) {
    info!("[LOCOMOTION_TASK] starting");
    let mut engine =
        LocomotionEngine::new(RobotConfig::new()).expect("invalid robot configuration");

    let mut command = MotionCommand::default();
    let mut pose_goal = BodyPose::default();
    let mut pose = BodyPose::default();
    let dt = SERVO_INTERVAL_MS as f32 / 1000.0;
    let translation_step = engine.config().body_speed * dt;
    let rotation_step = engine.config().turn_rate_limit * dt;

    let mut ticker = Ticker::every(Duration::from_millis(SERVO_INTERVAL_MS));
    loop {
        // Latest command wins; stale queue entries are drained.
        while let Ok(next) = command_receiver.try_receive() {
            command = next;
        }
        if let Some(next) = BODY_POSE.try_take() {
            pose_goal = next;
        }
        pose = pose.approach(&pose_goal, translation_step, rotation_step);

        let frame = engine.tick(&command, &pose, dt);
        ROBOT_STATE.lock(|state| *state.borrow_mut() = engine.snapshot());
        frame_sender.send(frame).await;
        ticker.next().await;
    }
}
