//! # Route Client
//!
//! The route client asks the coordination service which shape should be driven. It implements
//! [`ShapeSource`] so it can be handed to a [`RouteSelector`](crate::route::RouteSelector), which
//! runs the request away from the control loop and retries it when the service cannot be reached.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    net::{create_socket, zmq, NetError, NetParams, SocketOptions},
    route::{RouteRequest, RouteResponse},
};
use log::debug;

use crate::route::{RouteError, SelectionResult, ShapeSource};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Time to wait for the service to accept a request or send its reply.
const ROUTE_TIMEOUT_MS: i32 = 1000;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct RouteClient {
    /// Request-response socket to the coordination service
    reqrep: zmq::Socket,

    endpoint: String,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RouteClientError {
    #[error("Socket error: {0}")]
    SocketError(NetError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RouteClient {
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, RouteClientError> {
        // Relaxed and correlated so that a request can be resent after the previous one timed out
        let reqrep_opts = SocketOptions {
            connect_timeout: ROUTE_TIMEOUT_MS,
            linger: 1,
            recv_timeout: ROUTE_TIMEOUT_MS,
            send_timeout: ROUTE_TIMEOUT_MS,
            req_correlate: true,
            req_relaxed: true,
            ..Default::default()
        };

        let reqrep = create_socket(ctx, zmq::REQ, &reqrep_opts, &params.route_endpoint)
            .map_err(RouteClientError::SocketError)?;

        Ok(Self {
            reqrep,
            endpoint: params.route_endpoint.clone(),
        })
    }

    fn transport_error(&self, e: zmq::Error) -> RouteError {
        match e {
            zmq::Error::EAGAIN => RouteError::TransportUnavailable(format!(
                "no reply from {} within {} ms",
                self.endpoint, ROUTE_TIMEOUT_MS
            )),
            e => RouteError::TransportUnavailable(format!("{}: {}", self.endpoint, e)),
        }
    }
}

impl ShapeSource for RouteClient {
    fn fetch_shape(&mut self) -> SelectionResult {
        let request = RouteRequest::Shape
            .to_json()
            .map_err(|e| RouteError::InvalidResponse(e.to_string()))?;

        debug!("Sending route request to {}", self.endpoint);

        self.reqrep
            .send(&request, 0)
            .map_err(|e| self.transport_error(e))?;

        let reply = match self.reqrep.recv_string(0) {
            Ok(Ok(s)) => s,
            Ok(Err(_)) => {
                return Err(RouteError::InvalidResponse(String::from(
                    "reply is not valid UTF-8",
                )))
            }
            Err(e) => return Err(self.transport_error(e)),
        };

        debug!("Route reply: {}", reply);

        RouteResponse::from_json(&reply)
            .map(|r| r.shape)
            .map_err(|e| RouteError::InvalidResponse(e.to_string()))
    }
}
