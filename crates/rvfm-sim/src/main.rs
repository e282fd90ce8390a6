use anyhow::Context;
use clap::{Parser, Subcommand};
use rvfm_core::{EffectFlag, Gpu, Recorder, Spu};
use rvfm_sim::demo::{self, Demo, PHRASE_DONE};
use rvfm_sim::{SimConfig, SimMachine};

#[derive(Parser)]
#[command(name = "rvfm-sim")]
#[command(about = "Run rvfm command lists against a simulated machine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bytes per list region, including the 12-byte prefix
    #[arg(long, global = true, default_value = "4096")]
    region_size: usize,

    /// Lists each queue holds before rejecting submissions
    #[arg(long, global = true, default_value = "4")]
    queue_depth: usize,

    /// Print the recorded payloads as hex before running
    #[arg(long, global = true)]
    dump: bool,

    /// Suppress the execution trace
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record, present and reclaim two GPU frames
    Gpu,
    /// Play one note on SPU queue 0
    Spu,
    /// Both of the above
    All,
}

fn hex_dump(label: &str, bytes: &[u8]) {
    println!("{label} ({} bytes):", bytes.len());
    for (i, chunk) in bytes.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        println!("  {:04x}: {}", i * 16, hex.join(" "));
    }
}

/// Record the demo lists into scratch regions and print them.
fn dump_lists(machine: &SimMachine, demo: Demo, region_size: usize) -> anyhow::Result<()> {
    let memory = machine.memory();
    let hw = machine.hardware();
    if matches!(demo, Demo::Gpu | Demo::All) {
        let flag = EffectFlag::arm_present(memory.alloc_cell()?, &hw)?;
        let mut recorder = Recorder::<Gpu>::new(memory.alloc_region(region_size)?)?;
        demo::record_gpu_frame(&mut recorder, &flag, 0)?;
        hex_dump("gpu frame 0", recorder.finish().payload());
    }
    if matches!(demo, Demo::Spu | Demo::All) {
        let flag = EffectFlag::arm(memory.alloc_cell()?, &hw, PHRASE_DONE)?;
        let mut recorder = Recorder::<Spu>::new(memory.alloc_region(region_size)?)?;
        demo::record_spu_phrase(&mut recorder, &flag)?;
        hex_dump("spu phrase", recorder.finish().payload());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let demo = match cli.command {
        Commands::Gpu => Demo::Gpu,
        Commands::Spu => Demo::Spu,
        Commands::All => Demo::All,
    };
    let config = SimConfig {
        queue_depth: cli.queue_depth,
        ..SimConfig::default()
    };
    let machine = SimMachine::new(config).context("building the simulated machine")?;

    if cli.dump {
        dump_lists(&machine, demo, cli.region_size)?;
    }

    let report = demo::run(&machine, demo, cli.region_size)
        .with_context(|| format!("running the {demo:?} demo"))?;

    if !cli.quiet {
        for event in &report.trace {
            println!("{event}");
        }
    }
    eprintln!(
        "{} lists reclaimed after {} waits, {} of {} bytes of RAM used",
        report.lists,
        report.waits,
        machine.memory().used(),
        machine.memory().size()
    );
    Ok(())
}
