/// Image uploader for a running colour-cloud viewer.
use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::Parser;
use constants::relay::{RELAY_PORT, RelayMessage};
use std::fs;
use std::io::Write;
use std::net::TcpStream;
use std::path::PathBuf;

/// Send an image (and optional line geometry) to a running viewer over the
/// relay channel.
#[derive(Parser)]
#[command(name = "colour-cloud-export")]
struct Args {
    /// Image file to upload.
    image: PathBuf,

    /// Optional JSON file of [x, y, z] vertex triples in [0,1] cube
    /// coordinates; every three vertices form one closed loop.
    #[arg(long)]
    lines: Option<PathBuf>,

    /// Relay address of the viewer.
    #[arg(long, default_value_t = format!("127.0.0.1:{RELAY_PORT}"))]
    addr: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let bytes = fs::read(&args.image)
        .with_context(|| format!("could not read {}", args.image.display()))?;
    // Decode locally first so a broken file fails here, not in the viewer.
    image::load_from_memory(&bytes)
        .with_context(|| format!("{} is not a decodable image", args.image.display()))?;

    let mut stream = TcpStream::connect(&args.addr)
        .with_context(|| format!("no viewer listening on {}", args.addr))?;

    send(&mut stream, &RelayMessage::Image {
        data: BASE64.encode(&bytes),
    })?;
    println!("sent image {} ({} bytes)", args.image.display(), bytes.len());

    if let Some(path) = &args.lines {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let data: Vec<[f32; 3]> = serde_json::from_str(&text)
            .with_context(|| format!("{} is not a JSON list of [x,y,z] triples", path.display()))?;
        let count = data.len();

        send(&mut stream, &RelayMessage::Lines { data })?;
        println!("sent {count} line vertices");
    }

    Ok(())
}

fn send(stream: &mut TcpStream, message: &RelayMessage) -> Result<()> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    stream
        .write_all(line.as_bytes())
        .context("relay connection dropped mid-send")?;
    Ok(())
}
