//! Example showing the engine's tracing output for one encode/decode cycle.
//!
//! Run with: cargo run -p pixveil-core --example tracing_demo

use pixveil_core::{Method, PixelBuffer, Rgba, Stego};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    fmt()
        .with_env_filter(EnvFilter::new("pixveil_core=debug,info"))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    println!("=== Pixveil Tracing Demo ===\n");

    let cover = PixelBuffer::from_fn(256, 256, |x, y| {
        Rgba::opaque((x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8)
    });
    let stego = Stego::default();

    for method in Method::ALL {
        println!("--- {method} (capacity {} bytes) ---", stego.capacity(256, 256, method));

        let hidden = match stego.encode(&cover, "tracing demo", Some("demo"), method) {
            Ok(hidden) => hidden,
            Err(e) => {
                eprintln!("Encode failed: {e}");
                continue;
            }
        };

        match stego.decode(&hidden, Some("demo"), method) {
            Ok(message) => println!("Recovered: {message}\n"),
            Err(e) => eprintln!("Decode failed: {e}\n"),
        }
    }

    let report = stego.analyze(&cover);
    println!(
        "Cover LSB entropy: {:.4} (suspicious: {})",
        report.entropy, report.suspicious
    );
}
