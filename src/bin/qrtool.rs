use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Builder;
use log::{LevelFilter, debug, info};
use qr_ingest::{
    Detection, IgnoreReason, ScanConfig, ScanMode, ScanPayload, ScanSession, SessionEvent,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "qrtool", version, about = "QR payload ingestion tools")]
struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the byte-mode payload from hex codewords
    Decode {
        #[arg(long)]
        version: i32,
        #[arg(long)]
        hex: String,
    },
    /// Feed a recorded detection stream through a scan session
    Replay {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Mode::OncePerCode)]
        mode: Mode,
        /// Gap between frames without an explicit `@ms` timestamp
        #[arg(long, default_value_t = 33)]
        frame_ms: u64,
        /// Payloads to skip in continuous mode
        #[arg(long)]
        exclude: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Once,
    Manual,
    OncePerCode,
    Continuous,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Decode { version, hex } => decode_cmd(version, &hex),
        Command::Replay {
            input,
            mode,
            frame_ms,
            exclude,
        } => replay_cmd(&input, mode, frame_ms, exclude),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();
    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        let level = match (quiet, verbose) {
            (true, _) => LevelFilter::Error,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        };
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}

fn decode_cmd(version: i32, hex: &str) -> Result<()> {
    let codewords = parse_hex(hex)?;
    let bytes = qr_ingest::decode(&codewords, version)
        .with_context(|| format!("decoding {} codewords at version {}", codewords.len(), version))?;
    println!("{}", describe(&ScanPayload::Binary(bytes)));
    Ok(())
}

fn replay_cmd(input: &Path, mode: Mode, frame_ms: u64, exclude: Vec<String>) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("reading detections from {}", input.display()))?;

    let start = Instant::now();
    let detections = read_detections(&text, start, frame_ms)
        .with_context(|| format!("parsing {}", input.display()))?;
    info!("replaying {} detections from {}", detections.len(), input.display());

    let scan_mode = match mode {
        Mode::Once => ScanMode::Once,
        Mode::Manual => ScanMode::Manual,
        Mode::OncePerCode => ScanMode::OncePerCode,
        Mode::Continuous if exclude.is_empty() => ScanMode::Continuous,
        Mode::Continuous => ScanMode::ContinuousExcept(
            exclude
                .into_iter()
                .map(|text| ScanPayload::Text(text).fingerprint())
                .collect::<HashSet<_>>(),
        ),
    };

    let mut session = ScanSession::new(ScanConfig::new(scan_mode));
    if matches!(mode, Mode::Manual) {
        session.trigger_capture(start);
    }

    let mut completed = 0usize;
    let mut ignored = 0usize;
    for (i, event) in session.push_all(&detections).into_iter().enumerate() {
        match event {
            SessionEvent::Progress(progress) => {
                println!("[{i}] {} ({})", progress.display_text(), progress.detail_text());
            }
            SessionEvent::Complete(completion) => {
                completed += 1;
                let kind = completion
                    .content_type
                    .map(|t| format!(" {t:?}"))
                    .unwrap_or_default();
                println!(
                    "[{i}] complete{kind}, {} part(s): {}",
                    completion.parts,
                    describe(&completion.payload)
                );
            }
            SessionEvent::Error(err) => {
                let fatal = if err.is_session_fatal() { " (session)" } else { "" };
                println!("[{i}] error{fatal}: {err}");
            }
            SessionEvent::Ignored(reason) => {
                ignored += 1;
                debug!("[{i}] ignored: {}", ignore_text(reason));
            }
        }
    }
    info!("{completed} message(s) completed, {ignored} detection(s) ignored");
    Ok(())
}

/// One detection per non-blank, non-`#` line. Lines without `@ms` are spaced
/// `frame_ms` apart by detection count.
fn read_detections(text: &str, start: Instant, frame_ms: u64) -> Result<Vec<Detection>> {
    let mut detections = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let detection = parse_line(line, start, detections.len() as u64 * frame_ms)
            .with_context(|| format!("line {}", line_no + 1))?;
        detections.push(detection);
    }
    Ok(detections)
}

/// `[@ms ]text` or `[@ms ]raw:<version>:<hex>`
fn parse_line(line: &str, start: Instant, default_ms: u64) -> Result<Detection> {
    let (offset_ms, body) = match line.strip_prefix('@') {
        Some(rest) => {
            let (ms, body) = rest.split_once(' ').unwrap_or((rest, ""));
            let ms = ms.parse::<u64>().with_context(|| format!("bad timestamp {ms:?}"))?;
            (ms, body)
        }
        None => (default_ms, line),
    };
    let at = start + Duration::from_millis(offset_ms);

    match body.strip_prefix("raw:") {
        Some(raw) => {
            let Some((version, hex)) = raw.split_once(':') else {
                bail!("expected raw:<version>:<hex>");
            };
            let version = version
                .parse::<i32>()
                .with_context(|| format!("bad symbol version {version:?}"))?;
            Ok(Detection::raw(parse_hex(hex)?, version, at))
        }
        None => Ok(Detection::text(body, at)),
    }
}

fn parse_hex(hex: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits");
    }
    digits
        .chunks_exact(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).context("hex input is not ASCII")?;
            u8::from_str_radix(pair, 16).with_context(|| format!("bad hex byte {pair:?}"))
        })
        .collect()
}

fn describe(payload: &ScanPayload) -> String {
    match payload {
        ScanPayload::Text(text) => format!("{text:?}"),
        ScanPayload::Binary(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => format!("{} bytes {text:?}", bytes.len()),
            Err(_) => {
                let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
                format!("{} bytes 0x{hex}", bytes.len())
            }
        },
    }
}

fn ignore_text(reason: IgnoreReason) -> &'static str {
    match reason {
        IgnoreReason::Cancelled => "session cancelled",
        IgnoreReason::Paused => "paused",
        IgnoreReason::SessionFinished => "session finished",
        IgnoreReason::OutsideCaptureWindow => "outside capture window",
        IgnoreReason::AlreadySeen => "already seen",
        IgnoreReason::RateLimited => "rate limited",
        IgnoreReason::Excluded => "excluded",
        IgnoreReason::DuplicateFragment => "duplicate fragment",
        IgnoreReason::MultiPartComplete => "message already complete",
        IgnoreReason::MultiPartAborted => "message aborted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timestamps_skip_comments_and_blanks() {
        let start = Instant::now();
        let text = "# session\n\nfirst\n# pause\nsecond\n@500 third\nfourth\n";
        let detections = read_detections(text, start, 33).unwrap();
        let offsets: Vec<_> = detections.iter().map(|d| d.at() - start).collect();
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                Duration::from_millis(33),
                Duration::from_millis(500),
                Duration::from_millis(99),
            ]
        );
    }

    #[test]
    fn test_raw_line_and_bad_line() {
        let start = Instant::now();
        let detections = read_detections("raw:5:4034142430", start, 10).unwrap();
        assert_eq!(detections, vec![Detection::raw(vec![0x40, 0x34, 0x14, 0x24, 0x30], 5, start)]);

        let err = read_detections("ok\nraw:x:00\n", start, 10).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }
}
