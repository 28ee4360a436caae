//! Navigation control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use comms_if::eqpt::drive::VelocityCmd;
use log::{debug, error, info, warn};
use serde::Serialize;
use util::{maths::get_ang_dist, module::State, params};

// Internal
use super::*;
use crate::route::{RouteSelector, SelectionResult, WaypointQueue};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Navigation controller.
///
/// Owns the route's waypoint queue and the latest pose, and turns them into one velocity command
/// per control tick.
pub struct NavCtrl {
    params: Params,

    /// Executing phase, holding the active leg if there is one
    phase: NavPhase,

    /// Latest pose received, written only by `on_pose`
    current_pose: Option<Pose>,

    /// Heading of the latest pose, written only by `on_pose`
    current_rotation: Rotation,

    queue: WaypointQueue,

    selector: RouteSelector,

    /// Set once the first leg of a route has been started
    initiated: bool,

    /// Set while a route is loaded, cleared when the route is complete
    route_selected: bool,

    report: StatusReport,
}

/// One leg of a route, from the pose at which the leg started to the next waypoint.
///
/// All fields are computed together when the leg starts and the origin never changes afterwards.
#[derive(Debug, Copy, Clone)]
pub struct Leg {
    /// Pose of the robot when the leg started
    pub origin: Pose,

    /// Waypoint the leg drives to
    pub target: Pose,

    /// Bearing from the origin to the target, `rotated` once the rotate phase is done
    pub target_rotation: Rotation,

    /// Straight line distance from the origin to the target
    pub distance_m: f64,
}

/// Input data for one cycle of the controller.
#[derive(Debug, Copy, Clone, Default)]
pub struct NavInput {
    /// New pose sample received since the last cycle, if any
    pub pose: Option<Pose>,
}

/// The status report containing monitoring quantities of the last tick.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Mode at the end of the tick
    pub mode: NavMode,

    /// Heading error used to compute the angular command
    pub head_error_rad: f64,

    /// Distance travelled from the origin of the current leg
    pub traveled_m: f64,

    /// Leg length minus distance travelled
    pub remaining_m: f64,

    /// Number of waypoints still in the queue
    pub waypoints_left: usize,

    /// True if the robot is within the position tolerance of the leg's target
    pub at_target: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The phases of the controller. Each phase which needs a leg carries it, so a leg is always
/// fully computed before any tick can use it.
#[derive(Debug, Copy, Clone)]
pub enum NavPhase {
    /// No route has been started yet
    AwaitingPose,

    /// Turning on the spot towards the leg's target
    Rotating(Leg),

    /// Driving forward towards the leg's target
    Translating(Leg),

    /// All waypoints of the route have been reached
    RouteComplete,
}

/// Data-less view of [`NavPhase`], used for reporting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum NavMode {
    AwaitingPose,
    Rotating,
    Translating,
    RouteComplete,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Leg {
    /// Compute a leg starting at `origin` and ending at `target`.
    pub fn new(origin: Pose, target: Pose) -> Self {
        Self {
            origin,
            target,
            target_rotation: Rotation::new(origin.bearing_to(&target)),
            distance_m: origin.distance_to(&target),
        }
    }
}

impl NavPhase {
    pub fn mode(&self) -> NavMode {
        match self {
            NavPhase::AwaitingPose => NavMode::AwaitingPose,
            NavPhase::Rotating(_) => NavMode::Rotating,
            NavPhase::Translating(_) => NavMode::Translating,
            NavPhase::RouteComplete => NavMode::RouteComplete,
        }
    }

    pub fn leg(&self) -> Option<&Leg> {
        match self {
            NavPhase::Rotating(leg) | NavPhase::Translating(leg) => Some(leg),
            _ => None,
        }
    }
}

impl Default for NavMode {
    fn default() -> Self {
        NavMode::AwaitingPose
    }
}

impl NavCtrl {
    /// Create a new controller in the `AwaitingPose` phase.
    pub fn new(params: Params, queue: WaypointQueue, selector: RouteSelector) -> Self {
        Self {
            params,
            phase: NavPhase::AwaitingPose,
            current_pose: None,
            current_rotation: Rotation::default(),
            queue,
            selector,
            initiated: false,
            route_selected: false,
            report: StatusReport::default(),
        }
    }

    /// Create a new controller, loading its parameters from the given parameter file.
    pub fn init(
        params_path: &str,
        queue: WaypointQueue,
        selector: RouteSelector,
    ) -> Result<Self, NavCtrlError> {
        let params = params::load(params_path).map_err(NavCtrlError::ParamLoadError)?;

        Ok(Self::new(params, queue, selector))
    }

    /// Ingest a new pose sample.
    ///
    /// If no route is selected a route selection request is made (or the result of the pending
    /// one collected). Once a route is loaded and no leg is active, the first leg is started from
    /// this pose.
    pub fn on_pose(&mut self, pose: Pose) {
        self.current_pose = Some(pose);
        self.current_rotation = Rotation::new(pose.theta);

        if !self.route_selected {
            if !self.selector.is_pending() {
                info!("Requesting route selection");
                self.selector.request();
            }

            if let Some(result) = self.selector.poll() {
                self.apply_selection(result);
            }
        }

        if self.route_selected {
            match self.phase {
                NavPhase::AwaitingPose | NavPhase::RouteComplete => {
                    self.initiated = true;
                    self.start_leg(pose);
                }
                NavPhase::Rotating(_) | NavPhase::Translating(_) => (),
            }
        }
    }

    /// Process one control tick, returning the velocity command to send.
    ///
    /// This never fails: any error is logged and the zero command returned, so the next tick
    /// runs as normal.
    pub fn step(&mut self) -> VelocityCmd {
        match self.tick() {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!("Error during NavCtrl tick: {}", e);
                VelocityCmd::stop()
            }
        }
    }

    /// Abort the current route and return to `AwaitingPose`.
    ///
    /// Any pending route selection is cancelled and the current pose forgotten, the next pose
    /// sample will start a fresh route selection.
    pub fn reset(&mut self) {
        info!("NavCtrl reset, aborting current route");

        self.selector.cancel();
        self.queue.clear();

        self.phase = NavPhase::AwaitingPose;
        self.current_pose = None;
        self.current_rotation = Rotation::default();
        self.initiated = false;
        self.route_selected = false;
        self.report = StatusReport::default();
    }

    pub fn phase(&self) -> &NavPhase {
        &self.phase
    }

    pub fn mode(&self) -> NavMode {
        self.phase.mode()
    }

    /// The active leg, if the controller is rotating or translating.
    pub fn leg(&self) -> Option<&Leg> {
        self.phase.leg()
    }

    pub fn target_pose(&self) -> Option<Pose> {
        self.leg().map(|l| l.target)
    }

    pub fn target_rotation(&self) -> Option<Rotation> {
        self.leg().map(|l| l.target_rotation)
    }

    pub fn current_pose(&self) -> Option<Pose> {
        self.current_pose
    }

    pub fn current_rotation(&self) -> Rotation {
        self.current_rotation
    }

    pub fn is_initiated(&self) -> bool {
        self.initiated
    }

    pub fn is_route_selected(&self) -> bool {
        self.route_selected
    }

    pub fn waypoints_left(&self) -> usize {
        self.queue.len()
    }

    /// Report of the last tick.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// Load the route named by a completed selection request.
    fn apply_selection(&mut self, result: SelectionResult) {
        let name = match result {
            Ok(n) => n,
            Err(e) => {
                error!("Route selection failed: {}", e);
                return;
            }
        };

        match self.queue.load(name.as_deref()) {
            Ok(_) if self.queue.is_empty() => {
                warn!(
                    "Route \"{}\" has no waypoints and will complete immediately",
                    name.as_deref().unwrap_or("default")
                );
                self.route_selected = true;
            }
            Ok(num_waypoints) => {
                info!(
                    "Route \"{}\" selected, {} waypoints loaded",
                    name.as_deref().unwrap_or("default"),
                    num_waypoints
                );
                self.route_selected = true;
            }
            Err(e) => error!("Route selection rejected: {}", e),
        }
    }

    /// Start the next leg of the route from `pose`.
    ///
    /// If the queue is empty the route is complete, which clears `route_selected` so that the
    /// next pose sample selects a new route.
    fn start_leg(&mut self, pose: Pose) {
        match self.queue.dequeue() {
            Ok(target) => {
                let leg = Leg::new(pose, target);

                info!(
                    "Starting leg from {} to {}, bearing {:.3} rad, distance {:.3} m",
                    leg.origin, leg.target, leg.target_rotation.theta, leg.distance_m
                );

                self.phase = NavPhase::Rotating(leg);
            }
            Err(_) => {
                info!("Route complete at {}", pose);

                self.phase = NavPhase::RouteComplete;
                self.route_selected = false;
            }
        }
    }

    /// Tick processing, dispatching on the current phase.
    fn tick(&mut self) -> Result<VelocityCmd, NavCtrlError> {
        self.report = StatusReport {
            mode: self.phase.mode(),
            waypoints_left: self.queue.len(),
            ..Default::default()
        };

        if !self.initiated {
            return Ok(VelocityCmd::stop());
        }

        let cmd = match self.phase {
            NavPhase::AwaitingPose | NavPhase::RouteComplete => VelocityCmd::stop(),
            NavPhase::Rotating(leg) => self.phase_rotating(leg),
            NavPhase::Translating(leg) => {
                let pose = self.current_pose.ok_or(NavCtrlError::NoPose)?;
                self.phase_translating(leg, pose)
            }
        };

        self.report.mode = self.phase.mode();
        self.report.waypoints_left = self.queue.len();

        Ok(cmd)
    }

    /// Rotate phase.
    ///
    /// Turns on the spot until the heading matches the leg's bearing, then marks the target
    /// rotation as settled and switches to the translate phase.
    fn phase_rotating(&mut self, leg: Leg) -> VelocityCmd {
        let head_err_rad = self.heading_error(leg.target_rotation.theta);
        self.report.head_error_rad = head_err_rad;

        if self.heading_settled(&leg.target_rotation) {
            let leg = Leg {
                target_rotation: leg.target_rotation.settled(),
                ..leg
            };

            info!(
                "Heading settled at {}, target {}",
                self.current_rotation, leg.target_rotation
            );

            self.phase = NavPhase::Translating(leg);

            VelocityCmd::stop()
        } else {
            VelocityCmd::turn(self.turn_rate(head_err_rad))
        }
    }

    /// Translate phase.
    ///
    /// Drives forward while correcting heading towards the target, until the remaining distance
    /// is within the arrival threshold, at which point the next leg is started.
    fn phase_translating(&mut self, leg: Leg, pose: Pose) -> VelocityCmd {
        let head_err_rad = self.heading_error(pose.bearing_to(&leg.target));

        let angular_rads = if head_err_rad.abs() > self.params.rotation_tolerance_rad {
            self.turn_rate(head_err_rad)
        } else {
            0.0
        };

        let traveled_m = leg.origin.distance_to(&pose);
        let remaining_m = leg.distance_m - traveled_m;

        self.report.head_error_rad = head_err_rad;
        self.report.traveled_m = traveled_m;
        self.report.remaining_m = remaining_m;
        self.report.at_target = pose.within(&leg.target, self.params.position_tolerance_m);

        // Arrived once the distance travelled is within the threshold of the leg's length
        if traveled_m >= leg.distance_m - self.params.arrival_threshold_m {
            info!("Reached waypoint {} at {}", leg.target, pose);

            self.start_leg(pose);

            VelocityCmd {
                linear_ms: 0.0,
                angular_rads,
            }
        } else {
            debug!(
                "Translating: {:.3} m of {:.3} m, heading error {:.3} rad",
                traveled_m, leg.distance_m, head_err_rad
            );

            VelocityCmd {
                linear_ms: self.params.linear_speed_ms,
                angular_rads,
            }
        }
    }

    /// Error between the current heading and `target_rad`.
    fn heading_error(&self, target_rad: f64) -> f64 {
        if self.params.wrap_heading_error {
            get_ang_dist(self.current_rotation.theta, target_rad)
        } else {
            target_rad - self.current_rotation.theta
        }
    }

    fn heading_settled(&self, target: &Rotation) -> bool {
        if self.params.wrap_heading_error {
            self.heading_error(target.theta).abs() <= self.params.rotation_tolerance_rad
        } else {
            self.current_rotation
                .within(target, self.params.rotation_tolerance_rad)
        }
    }

    /// Fixed magnitude turn rate with the sign of the heading error.
    fn turn_rate(&self, head_err_rad: f64) -> f64 {
        if head_err_rad > 0.0 {
            self.params.angular_rate_rads
        } else {
            -self.params.angular_rate_rads
        }
    }
}

impl State for NavCtrl {
    type InputData = NavInput;
    type OutputData = VelocityCmd;
    type StatusReport = StatusReport;
    type ProcError = NavCtrlError;

    /// Ingest the cycle's pose sample, if any, then run one tick.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        if let Some(pose) = input_data.pose {
            self.on_pose(pose);
        }

        let cmd = self.tick()?;

        Ok((cmd, self.report))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::route::{FixedShapeSource, RetryParams, RouteError, ShapeCatalog};
    use std::collections::HashMap;
    use std::f64::consts::FRAC_PI_4;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn no_retry() -> RetryParams {
        RetryParams {
            max_attempts: 1,
            initial_backoff_s: 0.0,
            max_backoff_s: 0.0,
        }
    }

    fn catalog() -> ShapeCatalog {
        let mut extra = HashMap::new();
        extra.insert(String::from("line"), vec![Pose::new(2.0, 0.0, 0.0)]);
        extra.insert(String::from("back"), vec![Pose::new(-1.0, -0.15, 0.0)]);
        extra.insert(String::from("empty"), Vec::new());
        ShapeCatalog::with_shapes(extra)
    }

    fn nav_ctrl(shape: &str) -> NavCtrl {
        NavCtrl::new(
            Params::default(),
            WaypointQueue::new(catalog()),
            RouteSelector::blocking(FixedShapeSource::new(Some(shape.into())), no_retry()),
        )
    }

    /// Controller whose route source answers `shape` and counts how often it was asked.
    fn counting_nav_ctrl(shape: &'static str, calls: Arc<AtomicUsize>) -> NavCtrl {
        let source = move || -> SelectionResult {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(String::from(shape)))
        };

        NavCtrl::new(
            Params::default(),
            WaypointQueue::new(catalog()),
            RouteSelector::blocking(source, no_retry()),
        )
    }

    #[test]
    fn test_awaiting_pose() {
        let mut nav = nav_ctrl("square");

        assert!(nav.step().is_stop());
        assert_eq!(nav.mode(), NavMode::AwaitingPose);
        assert!(!nav.is_initiated());
        assert!(!nav.is_route_selected());
        assert!(nav.leg().is_none());
    }

    #[test]
    fn test_first_pose_starts_route() {
        let mut nav = nav_ctrl("square");

        nav.on_pose(Pose::new(0.0, 0.0, 0.0));

        assert!(nav.is_route_selected());
        assert!(nav.is_initiated());
        assert_eq!(nav.mode(), NavMode::Rotating);
        assert_eq!(nav.waypoints_left(), 4);

        let leg = *nav.leg().unwrap();
        assert_eq!((leg.target.x, leg.target.y), (1.0, 1.0));
        assert_eq!((leg.origin.x, leg.origin.y), (0.0, 0.0));
        assert!((leg.target_rotation.theta - FRAC_PI_4).abs() < 1e-12);
        assert!(!leg.target_rotation.rotated);
        assert!((leg.distance_m - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_phase() {
        let mut nav = nav_ctrl("square");

        nav.on_pose(Pose::new(0.0, 0.0, 0.0));

        // Target bearing is pi/4, turn left
        let cmd = nav.step();
        assert_eq!(cmd, VelocityCmd::turn(0.5));
        assert_eq!(nav.mode(), NavMode::Rotating);

        // Overshot, turn right
        nav.on_pose(Pose::new(0.0, 0.0, 1.0));
        assert_eq!(nav.step(), VelocityCmd::turn(-0.5));
        assert_eq!(nav.mode(), NavMode::Rotating);
        assert!((nav.report().head_error_rad - (FRAC_PI_4 - 1.0)).abs() < 1e-12);

        // Within tolerance, stop and switch to translating
        nav.on_pose(Pose::new(0.0, 0.0, 0.77));
        assert!(nav.step().is_stop());
        assert_eq!(nav.mode(), NavMode::Translating);
        assert!(nav.target_rotation().unwrap().rotated);

        // Leg origin and target are unchanged by the phase change
        let leg = nav.leg().unwrap();
        assert_eq!((leg.origin.x, leg.origin.y), (0.0, 0.0));
        assert_eq!((leg.target.x, leg.target.y), (1.0, 1.0));
    }

    #[test]
    fn test_translate_phase() {
        let mut nav = nav_ctrl("line");

        // Already facing the target, rotate phase completes on the first tick
        nav.on_pose(Pose::new(0.0, 0.0, 0.0));
        assert!((nav.leg().unwrap().distance_m - 2.0).abs() < 1e-12);
        assert!(nav.step().is_stop());
        assert_eq!(nav.mode(), NavMode::Translating);

        nav.on_pose(Pose::new(1.0, 0.0, 0.0));
        assert_eq!(
            nav.step(),
            VelocityCmd {
                linear_ms: 0.5,
                angular_rads: 0.0
            }
        );
        assert!((nav.report().traveled_m - 1.0).abs() < 1e-12);

        // Drifted left of the line, correct to the right while still driving
        nav.on_pose(Pose::new(1.0, 0.2, 0.0));
        assert_eq!(
            nav.step(),
            VelocityCmd {
                linear_ms: 0.5,
                angular_rads: -0.5
            }
        );

        nav.on_pose(Pose::new(1.85, 0.0, 0.0));
        assert_eq!(nav.step().linear_ms, 0.5);
        assert_eq!(nav.mode(), NavMode::Translating);

        // Within the arrival threshold, stop and move on
        nav.on_pose(Pose::new(1.95, 0.0, 0.0));
        assert_eq!(nav.step().linear_ms, 0.0);
        assert_eq!(nav.mode(), NavMode::RouteComplete);
        assert!(!nav.is_route_selected());
        assert!(nav.step().is_stop());
    }

    #[test]
    fn test_arrival_threshold_boundary() {
        let mut nav = nav_ctrl("line");

        nav.on_pose(Pose::new(0.0, 0.0, 0.0));
        nav.step();
        assert_eq!(nav.mode(), NavMode::Translating);

        // Just short of leg length minus threshold, keep driving
        nav.on_pose(Pose::new(1.89, 0.0, 0.0));
        assert_eq!(nav.step().linear_ms, 0.5);
        assert_eq!(nav.mode(), NavMode::Translating);

        // Travelled exactly 1.9 of 2.0 m, the leg is complete
        nav.on_pose(Pose::new(1.9, 0.0, 0.0));
        assert_eq!(nav.step().linear_ms, 0.0);
        assert_eq!(nav.mode(), NavMode::RouteComplete);
    }

    #[test]
    fn test_full_square_route() {
        let mut nav = nav_ctrl("square");
        let expected = [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)];

        let mut pose = Pose::new(0.0, 0.0, 0.0);
        nav.on_pose(pose);

        for &(x, y) in expected.iter() {
            let leg = *nav.leg().unwrap();
            assert_eq!((leg.target.x, leg.target.y), (x, y));
            assert_eq!(nav.mode(), NavMode::Rotating);

            // Face the target
            pose = Pose::new(pose.x, pose.y, leg.target_rotation.theta);
            nav.on_pose(pose);
            assert!(nav.step().is_stop());
            assert_eq!(nav.mode(), NavMode::Translating);
            assert!(nav.target_rotation().unwrap().rotated);

            // Arrive at the target
            pose = Pose::new(x, y, leg.target_rotation.theta);
            nav.on_pose(pose);
            assert_eq!(nav.step().linear_ms, 0.0);
            assert!(nav.report().at_target);

            // The next leg starts with its rotation not yet settled
            if let Some(rotation) = nav.target_rotation() {
                assert_eq!(nav.mode(), NavMode::Rotating);
                assert!(!rotation.rotated);
            }
        }

        assert_eq!(nav.mode(), NavMode::RouteComplete);
        assert!(!nav.is_route_selected());
        assert_eq!(nav.waypoints_left(), 0);
    }

    #[test]
    fn test_route_complete_triggers_new_selection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut nav = counting_nav_ctrl("line", calls.clone());

        nav.on_pose(Pose::new(0.0, 0.0, 0.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        nav.step();
        nav.on_pose(Pose::new(1.95, 0.0, 0.0));
        nav.step();
        assert_eq!(nav.mode(), NavMode::RouteComplete);

        // Still only one request, the next pose sample makes a new one
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        nav.on_pose(Pose::new(1.95, 0.0, 0.0));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(nav.is_route_selected());
        assert_eq!(nav.mode(), NavMode::Rotating);

        let leg = nav.leg().unwrap();
        assert_eq!((leg.origin.x, leg.origin.y), (1.95, 0.0));
        assert!((leg.distance_m - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_shape() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut nav = counting_nav_ctrl("triangle", calls.clone());

        nav.on_pose(Pose::new(0.0, 0.0, 0.0));

        assert!(!nav.is_route_selected());
        assert!(!nav.is_initiated());
        assert_eq!(nav.mode(), NavMode::AwaitingPose);
        assert!(nav.step().is_stop());

        // Selection is attempted again on the next sample
        nav.on_pose(Pose::new(0.0, 0.0, 0.0));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!nav.is_route_selected());
    }

    #[test]
    fn test_empty_route() {
        let mut nav = nav_ctrl("empty");

        nav.on_pose(Pose::new(0.0, 0.0, 0.0));

        assert_eq!(nav.mode(), NavMode::RouteComplete);
        assert!(!nav.is_route_selected());
        assert!(nav.step().is_stop());
    }

    #[test]
    fn test_transport_unavailable() {
        let source = || -> SelectionResult {
            Err(RouteError::TransportUnavailable(String::from("connection refused")))
        };
        let mut nav = NavCtrl::new(
            Params::default(),
            WaypointQueue::new(catalog()),
            RouteSelector::blocking(source, no_retry()),
        );

        nav.on_pose(Pose::new(0.0, 0.0, 0.0));

        assert!(!nav.is_route_selected());
        assert_eq!(nav.mode(), NavMode::AwaitingPose);
        assert!(nav.step().is_stop());
    }

    #[test]
    fn test_reset() {
        let mut nav = nav_ctrl("square");

        nav.on_pose(Pose::new(0.0, 0.0, 0.0));
        nav.step();
        assert_eq!(nav.mode(), NavMode::Rotating);

        nav.reset();

        assert_eq!(nav.mode(), NavMode::AwaitingPose);
        assert!(!nav.is_initiated());
        assert!(!nav.is_route_selected());
        assert!(nav.current_pose().is_none());
        assert_eq!(nav.waypoints_left(), 0);
        assert!(nav.step().is_stop());

        // A new pose restarts the route from its first waypoint
        nav.on_pose(Pose::new(0.5, 0.5, 0.0));
        assert_eq!(nav.mode(), NavMode::Rotating);
        assert_eq!(nav.waypoints_left(), 4);
        let target = nav.target_pose().unwrap();
        assert_eq!((target.x, target.y), (1.0, 1.0));
    }

    #[test]
    fn test_heading_error_wrapping() {
        // Facing just left of -x, target just right of -x
        let start = Pose::new(0.0, 0.0, 3.0);

        let mut raw = nav_ctrl("back");
        raw.on_pose(start);
        assert_eq!(raw.step(), VelocityCmd::turn(-0.5));

        let mut wrapped = NavCtrl::new(
            Params {
                wrap_heading_error: true,
                ..Params::default()
            },
            WaypointQueue::new(catalog()),
            RouteSelector::blocking(FixedShapeSource::new(Some("back".into())), no_retry()),
        );
        wrapped.on_pose(start);
        assert_eq!(wrapped.step(), VelocityCmd::turn(0.5));
        assert!(wrapped.report().head_error_rad.abs() < 0.5);
    }

    #[test]
    fn test_proc() -> Result<(), NavCtrlError> {
        let mut nav = nav_ctrl("square");

        let (cmd, report) = nav.proc(&NavInput::default())?;
        assert!(cmd.is_stop());
        assert_eq!(report.mode, NavMode::AwaitingPose);

        let (cmd, report) = nav.proc(&NavInput {
            pose: Some(Pose::new(0.0, 0.0, 0.0)),
        })?;
        assert_eq!(cmd, VelocityCmd::turn(0.5));
        assert_eq!(report.mode, NavMode::Rotating);
        assert_eq!(report.waypoints_left, 4);

        Ok(())
    }

    #[test]
    fn test_background_selection() {
        let mut nav = NavCtrl::new(
            Params::default(),
            WaypointQueue::new(catalog()),
            RouteSelector::spawn(FixedShapeSource::new(Some("g".into())), no_retry()),
        );

        // Pose ingestion never waits for the selection, the route starts on a later sample
        let pose = Pose::new(0.0, 0.0, 0.0);
        for _ in 0..200 {
            nav.on_pose(pose);
            if nav.is_route_selected() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        assert!(nav.is_route_selected());
        assert_eq!(nav.mode(), NavMode::Rotating);
        let target = nav.target_pose().unwrap();
        assert_eq!((target.x, target.y), (-1.0, 1.0));
    }
}
