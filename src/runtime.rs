// Fixed-rate drive loop with watchdog
// Each tick: drain inputs, run the drive estimator, mix the driver intent, publish duty.
// If controller input stops arriving the watchdog holds the motors at zero.
// If motor rates stop arriving the estimator sees a stopped drivetrain.

use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info, warn};

// local imports
use crate::config::{
    DriveConfig, AUTONOMOUS_ROTATION, AUTONOMOUS_VELOCITY, CMD_TIMEOUT, SENSOR_TIMEOUT,
    TOPIC_INPUT_CONTROLLER, TOPIC_RT_DRIVE, TOPIC_SENSOR_DRIVE,
};
use crate::drive::{DriveController, MotorRates};
use crate::input::{ButtonTracker, DriveIntent};
use crate::messages::{ControllerState, DriveActuation, RuntimeHealth};
use crate::profile::DriverProfile;

/// Everything the runtime needs, resolved before the loop starts
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    pub profile: DriverProfile,
    pub drive_config: DriveConfig,
    pub loop_hz: u64,
    pub autonomous: bool,
}

pub struct Runtime {
    drive: DriveController,
    buttons: ButtonTracker,
    latest_input: Option<ControllerState>,
    input_received_at: Instant,
    latest_rates: MotorRates,
    rates_received_at: Option<Instant>,
    rates_live: bool,
    fixed_intent: Option<DriveIntent>,
    last_tick: Option<Instant>,
    health: RuntimeHealth,
}

impl Runtime {
    pub fn new(profile: &DriverProfile, drive_config: DriveConfig) -> Self {
        let bindings = profile.bindings.resolve();
        info!("Bindings: {:?}", bindings);
        Self {
            drive: DriveController::new(drive_config, profile),
            buttons: ButtonTracker::new(bindings),
            latest_input: None,
            input_received_at: Instant::now(),
            latest_rates: MotorRates::default(),
            rates_received_at: None,
            rates_live: false,
            fixed_intent: None,
            last_tick: None,
            health: RuntimeHealth::CmdStale, // Start stale until first input
        }
    }

    /// Drive a fixed intent instead of controller input (autonomous)
    pub fn with_fixed_intent(mut self, intent: DriveIntent) -> Self {
        self.fixed_intent = Some(intent);
        self
    }

    /// Process incoming controller state
    pub fn on_controller(&mut self, state: ControllerState, now: Instant) {
        debug!("Received controller state: {:?}", &state);
        self.latest_input = Some(state);
        self.input_received_at = now;
    }

    /// Process incoming motor rates; only the latest sample per tick is used
    pub fn on_motor_rates(&mut self, rates: MotorRates, now: Instant) {
        self.latest_rates = rates;
        self.rates_received_at = Some(now);
    }

    /// Latest motor rates, or zero once they are older than SENSOR_TIMEOUT
    fn current_rates(&mut self, now: Instant) -> MotorRates {
        let fresh = self
            .rates_received_at
            .is_some_and(|at| now.saturating_duration_since(at) <= SENSOR_TIMEOUT);

        if fresh {
            if !self.rates_live {
                info!("Motor rates live");
            }
            self.rates_live = true;
            self.latest_rates
        } else {
            if self.rates_live {
                warn!("Motor rates stale, treating drivetrain as stopped");
            }
            self.rates_live = false;
            MotorRates::default()
        }
    }

    /// One control cycle: estimator update, then actuation
    pub fn tick(&mut self, now: Instant) -> DriveActuation {
        let elapsed = match self.last_tick {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f64(),
            None => 0.0,
        };
        self.last_tick = Some(now);
        let rates = self.current_rates(now);
        self.drive.periodic_update(rates, elapsed);
        self.compute_actuation(now)
    }

    /// Compute actuation based on watchdog state
    fn compute_actuation(&mut self, now: Instant) -> DriveActuation {
        if let Some(intent) = self.fixed_intent {
            self.health = RuntimeHealth::Ok;
            let output = self.drive.arcade_drive(intent.velocity, intent.rotation);
            return DriveActuation::from(output);
        }

        let input_age = now.saturating_duration_since(self.input_received_at);

        let state = match self.latest_input {
            Some(ref state) if input_age <= CMD_TIMEOUT => state,
            Some(_) => {
                // Watchdog triggered - stop the robot
                if self.health != RuntimeHealth::CmdStale {
                    warn!("Controller input stale ({:?} old), stopping robot", input_age);
                }
                self.health = RuntimeHealth::CmdStale;
                self.buttons.reset();
                return DriveActuation::default();
            }
            None => {
                // No input ever received
                self.health = RuntimeHealth::CmdStale;
                return DriveActuation::default();
            }
        };

        if self.health != RuntimeHealth::Ok {
            info!("Controller input live, driving");
        }
        self.health = RuntimeHealth::Ok;

        let actions = self.buttons.update(state);
        if actions.toggle_mode {
            self.drive.toggle_driving_mode();
            info!("Driving mode: {:?}", self.drive.driving_mode());
        }
        if actions.increment {
            self.drive.increment_coefficient();
        }
        if actions.decrement {
            self.drive.decrement_coefficient();
        }

        let intent = DriveIntent::from_controller(state);
        DriveActuation::from(self.drive.arcade_drive(intent.velocity, intent.rotation))
    }

    pub fn drive(&self) -> &DriveController {
        &self.drive
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }
}

pub async fn run(options: RuntimeOptions) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let sub_controller = session.declare_subscriber(TOPIC_INPUT_CONTROLLER).await?;
    let sub_sensor = session.declare_subscriber(TOPIC_SENSOR_DRIVE).await?;
    let pub_actuation = session.declare_publisher(TOPIC_RT_DRIVE).await?;

    let mut runtime = Runtime::new(&options.profile, options.drive_config);
    if options.autonomous {
        info!("Autonomous: driving fixed intent, controller input ignored");
        runtime = runtime.with_fixed_intent(DriveIntent {
            velocity: AUTONOMOUS_VELOCITY,
            rotation: AUTONOMOUS_ROTATION,
        });
    }
    let mut tick = interval(Duration::from_millis(1000 / options.loop_hz));

    info!(
        "Runtime started: {}Hz loop, {}ms watchdog timeout, profile '{}'",
        options.loop_hz,
        CMD_TIMEOUT.as_millis(),
        options.profile.name
    );
    info!("Subscribed to: {}, {}", TOPIC_INPUT_CONTROLLER, TOPIC_SENSOR_DRIVE);
    info!("Publishing to: {}", TOPIC_RT_DRIVE);

    loop {
        tick.tick().await;

        // 1. Drain pending controller states (non-blocking), keep latest
        while let Ok(Some(sample)) = sub_controller.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<ControllerState>(&payload) {
                Ok(state) => runtime.on_controller(state, Instant::now()),
                Err(e) => warn!("Failed to parse controller state: {}", e),
            }
        }

        // 2. Drain pending motor rates, keep latest
        while let Ok(Some(sample)) = sub_sensor.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<MotorRates>(&payload) {
                Ok(rates) => runtime.on_motor_rates(rates, Instant::now()),
                Err(e) => warn!("Failed to parse motor rates: {}", e),
            }
        }

        // 3. Estimator tick + actuation (includes watchdog logic)
        let actuation = runtime.tick(Instant::now());

        // 4. Publish actuation
        let actuation_json = serde_json::to_string(&actuation)?;
        pub_actuation.put(actuation_json).await?;
    }
}
