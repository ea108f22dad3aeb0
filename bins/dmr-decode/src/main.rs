use clap::{Parser, ValueEnum};

use std::fs::File;
use std::io::BufReader;
use std::thread;

use dmr_config::{DecoderConfig, InputFormat, toml_config};
use dmr_core::{Dibit, debug};
use dmr_decoder::{ChannelListener, DataUnitDetector, DecoderError, DetectorEvent, PacketSequenceAssembler};
use dmr_pdus::DmrMessage;

mod input;

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> DecoderConfig {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            println!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Bytes,
    Ascii,
}

impl From<FormatArg> for InputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Bytes => InputFormat::Bytes,
            FormatArg::Ascii => InputFormat::Ascii,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "DMR data burst decoder",
    long_about = "Finds DMR bursts in a captured dibit stream, decodes CSBKs and data headers and reassembles packet data"
)]
struct Args {
    /// Optional TOML config
    #[arg(long, help = "TOML config with sync and input parameters")]
    config: Option<String>,

    /// Overrides input.format from the config
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Capture file, stdin when absent
    #[arg(help = "Dibit capture, overrides input.file from the config")]
    input: Option<String>,
}

#[derive(Default)]
struct Stats {
    csbks: usize,
    headers: usize,
    blocks: usize,
    idle: usize,
    unsupported: usize,
    crc_failures: usize,
    packets: usize,
    sync_losses: usize,
}

impl Stats {
    fn count(&mut self, message: &DmrMessage) {
        match message {
            DmrMessage::Csbk(..) => self.csbks += 1,
            DmrMessage::DataHeader(..) => self.headers += 1,
            DmrMessage::DataBlock(..) => self.blocks += 1,
            DmrMessage::Idle(..) => self.idle += 1,
            DmrMessage::Unsupported(..) => self.unsupported += 1,
        }
        if !message.is_valid() {
            self.crc_failures += 1;
        }
    }
}

fn read_input(path: Option<&str>, format: InputFormat) -> Result<Vec<Dibit>, input::InputError> {
    match path {
        Some(p) if p != "-" => input::read_dibits(BufReader::new(File::open(p)?), format),
        _ => input::read_dibits(std::io::stdin().lock(), format),
    }
}

fn main() {
    eprintln!("░█▀▄░█▄█░█▀▄░░░░░█▀▄░█▀▀░█▀▀░█▀█░█▀▄░█▀▀");
    eprintln!("░█░█░█░█░█▀▄░▄▄▄░█░█░█▀▀░█░░░█░█░█░█░█▀▀");
    eprintln!("░▀▀░░▀░▀░▀░▀░░░░░▀▀░░▀▀▀░▀▀▀░▀▀▀░▀▀░░▀▀▀\n");

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => load_config_from_toml(path),
        None => DecoderConfig::default(),
    };
    if let Some(format) = args.format {
        cfg.input.format = format.into();
    }
    if args.input.is_some() {
        cfg.input.file = args.input.clone();
    }
    let _log_guard = debug::setup_logging_default(cfg.debug_log.clone());

    let dibits = match read_input(cfg.input.file.as_deref(), cfg.input.format) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("read {} dibits ({:?}), sync tolerance {}", dibits.len(), cfg.input.format, cfg.sync.max_bit_errors);

    let (tx, rx) = crossbeam_channel::bounded(1024);
    let max_bit_errors = cfg.sync.max_bit_errors;
    let decoder = thread::spawn(move || -> Result<u64, DecoderError> {
        let mut detector = DataUnitDetector::with_max_bit_errors(ChannelListener::new(tx), max_bit_errors)?;
        for dibit in dibits {
            detector.receive(dibit)?;
        }
        Ok(detector.timestamp())
    });

    let mut stats = Stats::default();
    let mut assembler = PacketSequenceAssembler::new();
    for event in rx.iter() {
        match event {
            DetectorEvent::DataUnit { message, bit_errors } => {
                tracing::info!(t = message.timestamp(), "{} (sync errors {})", message, bit_errors);
                stats.count(&message);
                if assembler.receive(message).is_some() {
                    stats.packets += 1;
                }
            }
            DetectorEvent::SyncLost { bit_errors } => {
                tracing::debug!("sync lost, {} bits skipped", bit_errors);
                stats.sync_losses += 1;
            }
        }
    }

    let duration_ms = match decoder.join() {
        Ok(Ok(ms)) => ms,
        Ok(Err(e)) => {
            tracing::error!("decoder stopped: {}", e);
            std::process::exit(1);
        }
        Err(_) => {
            tracing::error!("decoder thread panicked");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "{} ms decoded: {} csbk, {} headers, {} blocks, {} idle, {} unsupported, {} crc failures",
        duration_ms, stats.csbks, stats.headers, stats.blocks, stats.idle, stats.unsupported, stats.crc_failures
    );
    tracing::info!(
        "{} packets, {} sequences evicted, {} open, {} sync losses",
        stats.packets, assembler.evicted(), assembler.open_sequences(), stats.sync_losses
    );
}
