//! Simple odometry publisher test
//!
//! Publishes a fixed planar pose at 20 Hz. Usage: `test_odom_pub [x y yaw]`.

use comms_if::{
    eqpt::odom::PoseSample,
    net::{create_socket, SocketOptions},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<f64> = std::env::args()
        .skip(1)
        .map(|a| a.parse::<f64>())
        .collect::<Result<_, _>>()?;

    let (x, y, yaw) = match args.as_slice() {
        [x, y, yaw] => (*x, *y, *yaw),
        [] => (0.0, 0.0, 0.0),
        _ => return Err("Expected either zero or three arguments (x y yaw)".into()),
    };

    let ctx = zmq::Context::new();

    let socket_options = SocketOptions {
        bind: true,
        ..Default::default()
    };

    let socket = create_socket(&ctx, zmq::PUB, &socket_options, "tcp://*:5010")?;

    println!("Odometry publisher open on port 5010");

    loop {
        let sample = PoseSample::planar(x, y, yaw);

        match socket.send(serde_json::to_string(&sample)?.as_str(), 0) {
            Ok(_) => (),
            Err(e) => println!("Failed to send pose sample: {}", e),
        }

        std::thread::sleep(std::time::Duration::from_millis(50));
    }
}
