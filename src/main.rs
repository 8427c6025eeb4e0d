use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use modscope::batch::run_batch;
use modscope::io::{read_requests, write_json, write_series_txt, write_to_wav};
use modscope::server::{Server, ServerConfig, install_ctrlc};
use modscope::ui::progress::ProgressManager;
use modscope::ui::{print_banner, scheme_table};
use modscope::utils::consts::*;
use modscope::utils::logging::init_logging;
use modscope::{ModulationRequest, Scheme, SymbolSequence, SynthConfig, Synthesizer};

#[derive(Parser)]
#[command(author, version, about = "Digital/analog modulation signal synthesizer", long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file overriding the synthesis constants
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize one request and print the JSON result
    Modulate {
        #[arg(short, long, default_value = DEFAULT_SCHEME)]
        scheme: Scheme,
        /// Bitstream of '0'/'1' characters
        #[arg(short, long, conflicts_with = "random")]
        bits: Option<String>,
        /// Use a random bitstream of this length instead
        #[arg(long)]
        random: Option<usize>,
        #[arg(long, default_value_t = 0, requires = "random")]
        seed: u64,
        #[arg(short, long, default_value_t = DEFAULT_FREQUENCY)]
        frequency: f64,
        #[arg(short, long, default_value_t = DEFAULT_AMPLITUDE)]
        amplitude: f64,
        /// Write the JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also dump each series as text into this directory
        #[arg(long)]
        txt: Option<PathBuf>,
        /// Also write the modulated output as a 16-bit WAV
        #[arg(long)]
        wav: Option<PathBuf>,
    },
    /// Serve POST /modulate over HTTP
    Serve {
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        /// Defaults to $PORT, then 5000
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
        #[arg(long, default_value_t = MAX_BITSTREAM_LEN)]
        max_bits: usize,
    },
    /// List the supported schemes
    Schemes {
        #[arg(long)]
        json: bool,
    },
    /// Synthesize every request in a JSON array file
    Batch {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        max_bits: Option<usize>,
        /// No progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}

fn load_synth(path: Option<&PathBuf>) -> Result<Synthesizer> {
    let config = match path {
        Some(path) => SynthConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SynthConfig::default(),
    };
    Ok(Synthesizer::new(config)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let synth = load_synth(cli.config.as_ref())?;

    match cli.command {
        Commands::Modulate {
            scheme,
            bits,
            random,
            seed,
            frequency,
            amplitude,
            output,
            txt,
            wav,
        } => {
            let symbols = match (bits, random) {
                (_, Some(len)) => SymbolSequence::random(len, seed)?,
                (Some(bits), None) => bits.parse::<SymbolSequence>()?,
                (None, None) => DEFAULT_BITSTREAM.parse::<SymbolSequence>()?,
            };
            info!("Bitstream: {}", symbols);

            let request = ModulationRequest::new(scheme, symbols, frequency, amplitude)?;
            let result = request.run(&synth)?;

            match &output {
                Some(path) => write_json(&result, path)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => {
                    let mut stdout = std::io::stdout().lock();
                    serde_json::to_writer(&mut stdout, &result)?;
                    writeln!(stdout)?;
                }
            }
            if let Some(dir) = &txt {
                write_series_txt(&result, dir)
                    .with_context(|| format!("failed to write {}", dir.display()))?;
            }
            if let Some(path) = &wav {
                let rate = synth.sample_rate(request.frequency).round();
                if !(1.0..=u32::MAX as f64).contains(&rate) {
                    bail!("sample rate {rate} Hz cannot be stored in a WAV file");
                }
                write_to_wav(&result.modulated, request.amplitude, rate as u32, path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!("Wrote {} ({} Hz)", path.display(), rate);
            }
        }
        Commands::Serve {
            host,
            port,
            workers,
            max_bits,
        } => {
            print_banner();
            let mut config = ServerConfig::from_env();
            config.host = host;
            if let Some(port) = port {
                config.port = port;
            }
            config.workers = workers;
            config.max_bits = max_bits;

            let server = Server::bind(config.clone(), synth)
                .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
            install_ctrlc(server.shutdown_handle())?;
            server.run()?;
        }
        Commands::Schemes { json } => {
            if json {
                let schemes: Vec<_> = Scheme::ALL.iter().map(|s| s.info()).collect();
                println!("{}", serde_json::to_string_pretty(&schemes)?);
            } else {
                print!("{}", scheme_table());
            }
        }
        Commands::Batch {
            input,
            output,
            max_bits,
            quiet,
        } => {
            let requests = read_requests(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let progress = if quiet {
                ProgressManager::hidden()
            } else {
                ProgressManager::new()
            };
            let summary = run_batch(&requests, &synth, &output, max_bits, &progress)?;
            info!(
                "Batch finished: {} ok, {} failed, results in {}",
                summary.succeeded,
                summary.failed,
                output.display()
            );
        }
    }

    Ok(())
}
