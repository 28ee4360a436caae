//! Stand-in coordination service answering route selection requests.
//!
//! Usage: `test_route_server [shape]`. Without a shape the default route (`null`) is served.

use comms_if::{
    net::{create_socket, SocketOptions},
    route::{RouteRequest, RouteResponse},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let shape = std::env::args().nth(1);

    let ctx = zmq::Context::new();

    let socket_options = SocketOptions {
        bind: true,
        ..Default::default()
    };

    let socket = create_socket(&ctx, zmq::REP, &socket_options, "tcp://*:8000")?;

    println!("Route server running on port 8000, serving {:?}", shape);

    let response = serde_json::to_string(&RouteResponse { shape })?;

    loop {
        let msg = socket.recv_msg(0)?;

        match msg.as_str().map(serde_json::from_str::<RouteRequest>) {
            Some(Ok(RouteRequest::Shape)) => {
                println!("Shape requested, sending {}", response);
                socket.send(response.as_str(), 0)?;
            }
            Some(Err(e)) => {
                println!("Invalid request: {}", e);
                socket.send("{}", 0)?;
            }
            None => {
                println!("Received non UTF-8 request");
                socket.send("{}", 0)?;
            }
        }
    }
}
