//! osc_monitor - print every OSC message arriving on a UDP port
//!
//! Usage:
//!   cargo run --release --bin osc_monitor -- --bind 0.0.0.0:9000

use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use oscwire::network::{OscReceiver, ReceiverStats};
use oscwire::{OscMessage, ReadConfig, ReceiverConfig};

/// Monitor configuration
struct MonitorConfig {
    receiver: ReceiverConfig,
    verbose: bool,
    stats_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            receiver: ReceiverConfig::default(),
            verbose: false,
            stats_interval: Duration::from_secs(5),
        }
    }
}

fn print_stats(stats: &ReceiverStats, uptime: Duration) {
    let rate = stats.messages_decoded as f64 / uptime.as_secs_f64();

    println!("\n📊 Monitor Stats (uptime: {:.1}s)", uptime.as_secs_f64());
    println!("   Datagrams:     {}", stats.datagrams_received);
    println!("   Messages:      {} ({:.1}/sec)", stats.messages_decoded, rate);
    println!("   Bytes in:      {} KB", stats.bytes_received / 1024);
    if stats.messages_dropped > 0 {
        println!("   Malformed:     {} ⚠️", stats.messages_dropped);
    }
}

fn print_message(from: SocketAddr, message: &OscMessage<'_>, verbose: bool) {
    println!("[{}] {}", from, message);
    if verbose {
        let values = message.values();
        for (i, tag) in message.type_tags().iter().enumerate() {
            println!(
                "    #{:<2} '{}' @ {:>4}",
                i,
                tag.as_char(),
                values.offset(i).unwrap_or_default()
            );
        }
    }
}

fn run_monitor(config: MonitorConfig) -> io::Result<()> {
    let mut receiver = OscReceiver::bind(&config.receiver)?;
    println!("🔌 Listening on {}", receiver.local_addr()?);
    println!(
        "🛡️  Safety checks: {}",
        if config.receiver.read.safety_checks { "ENABLED" } else { "DISABLED" }
    );

    let start_time = Instant::now();
    let mut last_stats_print = Instant::now();
    let verbose = config.verbose;

    loop {
        receiver.poll_once(Some(config.receiver.poll_timeout), |from, message| {
            print_message(from, message, verbose)
        })?;

        if last_stats_print.elapsed() > config.stats_interval {
            print_stats(&receiver.stats(), start_time.elapsed());
            last_stats_print = Instant::now();
        }
    }
}

fn parse_args() -> MonitorConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = MonitorConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(addr) => config.receiver.bind_addr = addr,
                        Err(e) => {
                            eprintln!("❌ Bad bind address {:?}: {}", args[i + 1], e);
                            std::process::exit(2);
                        }
                    }
                    i += 1;
                }
            }
            "--buffer" => {
                if i + 1 < args.len() {
                    config.receiver.buffer_size =
                        args[i + 1].parse().unwrap_or(config.receiver.buffer_size);
                    i += 1;
                }
            }
            "--stats" => {
                if i + 1 < args.len() {
                    config.stats_interval = Duration::from_secs(args[i + 1].parse().unwrap_or(5));
                    i += 1;
                }
            }
            "--no-checks" => {
                config.receiver.read = ReadConfig::UNCHECKED;
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--help" | "-h" => {
                println!("osc_monitor - print incoming OSC messages\n");
                println!("Usage: osc_monitor [OPTIONS]\n");
                println!("Options:");
                println!("  -b, --bind <ADDR>     Bind address (default: 0.0.0.0:9000)");
                println!("      --buffer <BYTES>  Receive buffer size (default: 65507)");
                println!("      --stats <SECS>    Stats interval (default: 5)");
                println!("      --no-checks       Disable out-of-range read diagnostics");
                println!("  -v, --verbose         Print element tags and offsets");
                println!("  -h, --help            Show this help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn main() {
    env_logger::init();
    let config = parse_args();

    if let Err(e) = run_monitor(config) {
        eprintln!("❌ Monitor error: {}", e);
        std::process::exit(1);
    }
}
