//! osc_send - send one OSC message over UDP
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin osc_send -- --host 127.0.0.1 --port 9000 /synth/freq f:440
//! ```
//!
//! # Element syntax
//!
//! - `i:INT` `h:INT64` `f:FLOAT` `d:DOUBLE` `s:TEXT` `c:CHAR`
//! - `b:HEX` - blob bytes as hex, e.g. `b:010203`
//! - `r:RRGGBBAA` - color, `m:PPSSD1D2` - MIDI message (hex)
//! - `t:now` or `t:NTP64` - time tag
//! - `T` `F` `N` `I` - true, false, nil, infinitum

use std::thread;
use std::time::{Duration, SystemTime};

use log::debug;
use oscwire::network::OscClient;
use oscwire::{ClientConfig, Color32, Element, MidiMessage, TimeTag};

/// Owned form of an element parsed from the command line
#[derive(Debug, Clone, PartialEq)]
enum Arg {
    Int32(i32),
    Float32(f32),
    String(String),
    Blob(Vec<u8>),
    Int64(i64),
    Float64(f64),
    TimeTag(TimeTag),
    Char(char),
    Color32(Color32),
    Midi(MidiMessage),
    Bool(bool),
    Nil,
    Infinitum,
}

impl Arg {
    fn as_element(&self) -> Element<'_> {
        match self {
            Arg::Int32(v) => Element::Int32(*v),
            Arg::Float32(v) => Element::Float32(*v),
            Arg::String(v) => Element::String(v),
            Arg::Blob(v) => Element::Blob(v),
            Arg::Int64(v) => Element::Int64(*v),
            Arg::Float64(v) => Element::Float64(*v),
            Arg::TimeTag(v) => Element::TimeTag(*v),
            Arg::Char(v) => Element::Char(*v),
            Arg::Color32(v) => Element::Color32(*v),
            Arg::Midi(v) => Element::Midi(*v),
            Arg::Bool(v) => Element::Bool(*v),
            Arg::Nil => Element::Nil,
            Arg::Infinitum => Element::Infinitum,
        }
    }
}

fn parse_four_bytes(hex_str: &str) -> Result<[u8; 4], String> {
    let bytes = hex::decode(hex_str).map_err(|e| format!("bad hex {hex_str:?}: {e}"))?;
    bytes
        .try_into()
        .map_err(|_| format!("expected 4 bytes (8 hex digits), got {hex_str:?}"))
}

fn parse_arg(text: &str) -> Result<Arg, String> {
    match text {
        "T" => return Ok(Arg::Bool(true)),
        "F" => return Ok(Arg::Bool(false)),
        "N" => return Ok(Arg::Nil),
        "I" => return Ok(Arg::Infinitum),
        _ => {}
    }

    let (kind, value) = text
        .split_once(':')
        .ok_or_else(|| format!("element {text:?} must look like TAG:VALUE"))?;
    let bad = |e: &dyn std::fmt::Display| format!("bad {kind} value {value:?}: {e}");

    let arg = match kind {
        "i" => Arg::Int32(value.parse().map_err(|e| bad(&e))?),
        "h" => Arg::Int64(value.parse().map_err(|e| bad(&e))?),
        "f" => Arg::Float32(value.parse().map_err(|e| bad(&e))?),
        "d" => Arg::Float64(value.parse().map_err(|e| bad(&e))?),
        "s" => Arg::String(value.to_string()),
        "c" => Arg::Char(value.parse().map_err(|e| bad(&e))?),
        "b" => Arg::Blob(hex::decode(value).map_err(|e| bad(&e))?),
        "r" => Arg::Color32(Color32::from_bytes(parse_four_bytes(value)?)),
        "m" => Arg::Midi(MidiMessage::from_bytes(parse_four_bytes(value)?)),
        "t" if value == "now" => Arg::TimeTag(TimeTag::from_system_time(SystemTime::now())),
        "t" => Arg::TimeTag(TimeTag::from_u64(value.parse().map_err(|e| bad(&e))?)),
        _ => return Err(format!("unknown element tag {kind:?}")),
    };
    Ok(arg)
}

/// Sender configuration
struct SendConfig {
    client: ClientConfig,
    address: String,
    args: Vec<Arg>,
    repeat: u32,
    interval: Duration,
}

fn print_help() {
    println!("osc_send - send one OSC message over UDP\n");
    println!("Usage: osc_send [OPTIONS] <ADDRESS> [ELEMENT...]\n");
    println!("Options:");
    println!("  -H, --host <IP>        Destination IP (default: 127.0.0.1)");
    println!("  -p, --port <PORT>      Destination port (default: 9000)");
    println!("  -n, --repeat <N>       Send N times (default: 1)");
    println!("      --interval <MS>    Delay between repeats (default: 100)");
    println!("  -h, --help             Show this help\n");
    println!("Elements: i:INT h:INT64 f:FLOAT d:DOUBLE s:TEXT c:CHAR b:HEX");
    println!("          r:RRGGBBAA m:PPSSD1D2 t:now|NTP64 T F N I");
}

fn parse_args() -> Result<SendConfig, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SendConfig {
        client: ClientConfig::default(),
        address: String::new(),
        args: Vec::new(),
        repeat: 1,
        interval: Duration::from_millis(100),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-H" => {
                if i + 1 < args.len() {
                    config.client.host = args[i + 1].clone();
                    i += 1;
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    config.client.port = args[i + 1]
                        .parse()
                        .map_err(|e| format!("bad port {:?}: {}", args[i + 1], e))?;
                    i += 1;
                }
            }
            "--repeat" | "-n" => {
                if i + 1 < args.len() {
                    config.repeat = args[i + 1].parse().unwrap_or(1);
                    i += 1;
                }
            }
            "--interval" => {
                if i + 1 < args.len() {
                    config.interval = Duration::from_millis(args[i + 1].parse().unwrap_or(100));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other if config.address.is_empty() => config.address = other.to_string(),
            other => config.args.push(parse_arg(other)?),
        }
        i += 1;
    }

    if config.address.is_empty() {
        return Err("missing OSC address".to_string());
    }
    Ok(config)
}

fn run(config: SendConfig) -> Result<(), String> {
    let mut client = OscClient::with_config(&config.client).map_err(|e| e.to_string())?;
    let elements: Vec<Element<'_>> = config.args.iter().map(Arg::as_element).collect();

    for n in 0..config.repeat {
        if n > 0 {
            thread::sleep(config.interval);
        }
        client
            .send(&config.address, &elements)
            .map_err(|e| e.to_string())?;
        debug!("sent {} bytes", client.writer().len());
    }

    println!(
        "Sent {} x {} to {}",
        client.messages_sent(),
        config.address,
        client.destination()
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let result = parse_args().and_then(run);
    if let Err(e) = result {
        eprintln!("osc_send: {}", e);
        std::process::exit(1);
    }
}
