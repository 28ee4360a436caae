//! Main navigation executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Initialise the route selector, the controller and the network clients
//!     - Main loop, one iteration per control tick:
//!         - Pose acquisition from the odometry client
//!         - Navigation control processing
//!         - Velocity command output to the drive client
//!         - Tick management
//!
//! # Route selection
//!
//! By default the route is chosen by the coordination service, asked through the `RouteClient`
//! on a background thread. Passing `--shape <name>` uses the named shape instead, with
//! `--shape default` selecting the default route.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::Utc;
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, error, info, trace, warn};
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use comms_if::{eqpt::drive::VelocityCmd, net::NetParams};
use nav_lib::{
    drive_client::DriveClient,
    nav_ctrl::{NavCtrl, NavInput, NavMode, Pose},
    odom_client::{sample_age_s, OdomClient},
    params::NavExecParams,
    route::{
        FixedShapeSource, RouteParams, RouteSelector, ShapeCatalog, WaypointQueue,
        DEFAULT_SHAPE_NAME,
    },
    route_client::RouteClient,
    tick::TickTimer,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options of the navigation executable.
#[derive(Debug, StructOpt)]
#[structopt(name = "nav_exec", about = "Waypoint following navigation executable")]
struct Opts {
    /// Drive the named shape instead of asking the coordination service.
    ///
    /// Use `default` to drive the default route.
    #[structopt(long)]
    shape: Option<String>,

    /// Exit once the first route has been completed.
    #[structopt(long)]
    single_route: bool,

    /// Log at trace level rather than info.
    #[structopt(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("nav_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let min_level = match opts.verbose {
        true => LevelFilter::Trace,
        false => LevelFilter::Info,
    };
    logger_init(min_level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Navigation Executable\n");
    info!(
        "Software root: {:?}",
        host::get_nav_sw_root().wrap_err("Failed to get the software root")?
    );
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let exec_params: NavExecParams =
        util::params::load("nav_exec.toml").wrap_err("Could not load exec params")?;
    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;
    let route_params: RouteParams =
        util::params::load("route.toml").wrap_err("Could not load route params")?;

    let tick_period = exec_params
        .tick_period()
        .wrap_err("Invalid exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE NETWORK ----

    info!("Initialising network");

    let zmq_ctx = comms_if::net::zmq::Context::new();

    let odom_client = {
        let c = OdomClient::new(&zmq_ctx, &net_params)
            .wrap_err("Failed to initialise the OdomClient")?;
        info!("OdomClient initialised");
        c
    };

    let drive_client = {
        let c = DriveClient::new(&zmq_ctx, &net_params)
            .wrap_err("Failed to initialise the DriveClient")?;
        info!("DriveClient initialised");
        c
    };

    info!("Network initialisation complete");

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let catalog = ShapeCatalog::with_shapes(route_params.shapes);
    info!("Shape catalog: {:?}", catalog.names());

    let selector = match opts.shape {
        Some(ref name) => {
            let shape = match name.as_str() {
                DEFAULT_SHAPE_NAME => None,
                n => Some(String::from(n)),
            };

            if !catalog.contains(shape.as_deref()) {
                return Err(eyre!(
                    "No shape named \"{}\", expected one of {:?} or \"{}\"",
                    name,
                    catalog.names(),
                    DEFAULT_SHAPE_NAME
                ));
            }

            info!("Using fixed route \"{}\"", name);
            RouteSelector::blocking(FixedShapeSource::new(shape), route_params.retry)
        }
        None => {
            let client = RouteClient::new(&zmq_ctx, &net_params)
                .wrap_err("Failed to initialise the RouteClient")?;
            info!(
                "Routes will be selected by the coordination service at {}",
                net_params.route_endpoint
            );
            RouteSelector::spawn(client, route_params.retry)
        }
    };

    let mut nav_ctrl = NavCtrl::init("nav_ctrl.toml", WaypointQueue::new(catalog), selector)
        .wrap_err("Failed to initialise NavCtrl")?;
    info!("NavCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Beginning main loop\n");

    let mut timer = TickTimer::new(tick_period, Instant::now());
    let mut num_consec_overruns: u64 = 0;
    let mut num_ticks: u64 = 0;

    loop {
        // ---- DATA INPUT ----

        let sample = odom_client.take_pose();

        if let Some(ref s) = sample {
            match sample_age_s(s, Utc::now()) {
                Some(age_s) if age_s > exec_params.max_pose_age_s => {
                    warn!("Pose sample is {:.03} s old", age_s)
                }
                Some(_) => (),
                None => warn!("Could not determine the age of the pose sample"),
            }
        }

        let input = NavInput {
            pose: sample.map(|s| Pose::from_sample(&s)),
        };

        // ---- CONTROL ALGORITHM PROCESSING ----

        let cmd = match nav_ctrl.proc(&input) {
            Ok((cmd, report)) => {
                trace!("NavCtrl status: {:?}", report);
                cmd
            }
            Err(e) => {
                warn!("Error during NavCtrl processing: {}", e);
                VelocityCmd::stop()
            }
        };

        // ---- OUTPUT ----

        if let Err(e) = drive_client.send(&cmd) {
            warn!("DriveClient error: {}", e);
        }

        if opts.single_route && nav_ctrl.mode() == NavMode::RouteComplete {
            info!("Route complete, stopping");
            break;
        }

        // ---- TICK MANAGEMENT ----

        num_ticks += 1;

        let tick_wait = timer.wait();

        if tick_wait.sleep == Duration::from_secs(0) {
            num_consec_overruns += 1;

            if tick_wait.dropped > 0 {
                warn!(
                    "Tick overran, {} tick(s) dropped ({} in total)",
                    tick_wait.dropped,
                    timer.num_dropped()
                );
            } else {
                warn!("Tick overran");
            }

            if num_consec_overruns == exec_params.overrun_warn_limit {
                error!(
                    "{} consecutive tick overruns, the tick period of {:.03} s cannot be met",
                    num_consec_overruns,
                    timer.period().as_secs_f64()
                );
            }
        } else {
            num_consec_overruns = 0;
        }
    }

    // ---- SHUTDOWN ----

    if let Err(e) = drive_client.send(&VelocityCmd::stop()) {
        warn!("Could not send the final stop command: {}", e);
    }

    info!("End of execution after {} ticks", num_ticks);

    Ok(())
}
