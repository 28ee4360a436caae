//! # Odometry Client
//!
//! The odometry client subscribes to the pose samples published by the robot base. Samples are
//! received on a background thread which keeps only the most recent one, the main loop then takes
//! that sample once per cycle with [`OdomClient::take_pose`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
    thread::{self, JoinHandle},
};

use chrono::{DateTime, Utc};
use comms_if::{
    eqpt::odom::PoseSample,
    net::{create_socket, zmq, NetError, NetParams, SocketOptions},
};
use log::{error, info, warn};
use util::time::duration_to_seconds;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct OdomClient {
    bg_jh: Option<JoinHandle<()>>,
    bg_run: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<PoseSample>>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum OdomClientError {
    #[error("Socket error: {0}")]
    SocketError(NetError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl OdomClient {
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, OdomClientError> {
        // Only the latest sample is of interest, older ones are dropped by the socket
        let socket_options = SocketOptions {
            conflate: true,
            linger: 1,
            recv_timeout: 10,
            ..Default::default()
        };

        let socket = create_socket(ctx, zmq::SUB, &socket_options, &params.odom_endpoint)
            .map_err(OdomClientError::SocketError)?;

        let bg_run = Arc::new(AtomicBool::new(true));
        let latest = Arc::new(Mutex::new(None));

        let bg_run_clone = bg_run.clone();
        let latest_clone = latest.clone();

        let bg_jh = Some(thread::spawn(move || {
            bg_thread(socket, bg_run_clone, latest_clone)
        }));

        info!("Subscribed to odometry on {}", params.odom_endpoint);

        Ok(Self {
            bg_jh,
            bg_run,
            latest,
        })
    }

    /// Take the latest pose sample, if a new one has arrived since the last call.
    pub fn take_pose(&self) -> Option<PoseSample> {
        lock(&self.latest).take()
    }
}

impl Drop for OdomClient {
    fn drop(&mut self) {
        self.bg_run.store(false, Ordering::Relaxed);

        if let Some(jh) = self.bg_jh.take() {
            jh.join().ok();
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Age of a sample at `now`, in seconds. `None` if the difference cannot be represented.
pub fn sample_age_s(sample: &PoseSample, now: DateTime<Utc>) -> Option<f64> {
    duration_to_seconds(now.signed_duration_since(sample.timestamp))
}

/// Background thread, stores each sample the robot base publishes.
fn bg_thread(socket: zmq::Socket, run: Arc<AtomicBool>, latest: Arc<Mutex<Option<PoseSample>>>) {
    while run.load(Ordering::Relaxed) {
        let msg = match socket.recv_string(0) {
            Ok(Ok(s)) => s,
            Ok(Err(_)) => {
                warn!("Non UTF-8 message on the odometry stream");
                continue;
            }
            Err(zmq::Error::EAGAIN) => continue,
            Err(e) => {
                error!("Error receiving odometry: {:?}", e);
                break;
            }
        };

        let sample = match PoseSample::from_json(&msg) {
            Ok(s) => s,
            Err(e) => {
                warn!("Error deserialising pose sample: {}", e);
                continue;
            }
        };

        *lock(&latest) = Some(sample);
    }
}

/// Lock the sample slot. The slot holds plain data so a poisoned lock is still usable.
fn lock(latest: &Mutex<Option<PoseSample>>) -> MutexGuard<'_, Option<PoseSample>> {
    latest.lock().unwrap_or_else(|e| e.into_inner())
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sample_age() {
        let sample = PoseSample::planar(0.0, 0.0, 0.0);

        let age = sample_age_s(&sample, sample.timestamp + chrono::Duration::milliseconds(250));
        assert_eq!(age, Some(0.25));

        let age = sample_age_s(&sample, sample.timestamp - chrono::Duration::milliseconds(100));
        assert_eq!(age, Some(-0.1));
    }
}
