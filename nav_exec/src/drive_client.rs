//! # Drive Client
//!
//! Publishes the velocity command produced each cycle to the robot base.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    eqpt::drive::VelocityCmd,
    net::{create_socket, zmq, NetError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct DriveClient {
    socket: zmq::Socket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DriveClientError {
    #[error("Socket error: {0}")]
    SocketError(NetError),

    #[error("Could not serialize the command: {0}")]
    SerializationError(serde_json::Error),

    #[error("Could not send the command: {0}")]
    SendError(zmq::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DriveClient {
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, DriveClientError> {
        let socket_options = SocketOptions {
            bind: true,
            linger: 1,
            send_timeout: 10,
            ..Default::default()
        };

        let socket = create_socket(ctx, zmq::PUB, &socket_options, &params.cmd_vel_endpoint)
            .map_err(DriveClientError::SocketError)?;

        Ok(Self { socket })
    }

    /// Publish a velocity command.
    pub fn send(&self, cmd: &VelocityCmd) -> Result<(), DriveClientError> {
        let cmd_str = serde_json::to_string(cmd).map_err(DriveClientError::SerializationError)?;

        self.socket
            .send(&cmd_str, 0)
            .map_err(DriveClientError::SendError)
    }
}
