use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for ttdma")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Run tests
    Test {
        #[arg(long)]
        doc: bool,
        /// Run only DMA engine tests
        #[arg(long)]
        dma: bool,
        /// Run only byte store tests
        #[arg(long)]
        memory: bool,
        /// Run only system harness tests
        #[arg(long)]
        system: bool,
    },
    /// Run benchmarks
    Bench,
    /// Run the reference scenario through the ttdma binary
    Scenario {
        /// Write the cycle trace here
        #[arg(long)]
        trace: Option<String>,
        /// Extra commands (raw control byte or single:S:D / burst:S:D)
        #[arg(short = 'c', long = "command")]
        commands: Vec<String>,
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Test {
            doc,
            dma,
            memory,
            system,
        } => run_test(doc, dma, memory, system),
        Commands::Bench => execute_command(Command::new("cargo").arg("bench")),
        Commands::Scenario {
            trace,
            commands,
            release,
        } => run_scenario(trace.as_deref(), &commands, release),
    }
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());

    let start = Instant::now();

    let steps: [(&str, &[&str]); 3] = [
        ("Format Check", &["fmt", "--all", "--", "--check"]),
        ("Clippy", &["clippy", "--all-targets", "--", "-D", "warnings"]),
        ("Build", &["build"]),
    ];
    for (name, args) in steps {
        run_task(
            name,
            || execute_command(Command::new("cargo").args(args)),
            verbose,
        )?;
    }
    run_task("Test", || run_test(false, false, false, false), verbose)?;

    let elapsed = start.elapsed();
    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_test(doc: bool, dma: bool, memory: bool, system: bool) -> Result<()> {
    if doc {
        return execute_command(Command::new("cargo").arg("test").arg("--doc"));
    }

    let modules = [
        (dma, "core::dma", "DMA"),
        (memory, "core::memory", "Memory"),
        (system, "core::system", "System"),
    ];

    if modules.iter().all(|(enabled, _, _)| !enabled) {
        return execute_command(Command::new("cargo").arg("test"));
    }

    let mut failed = Vec::new();

    for (enabled, module_path, module_name) in modules {
        if !enabled {
            continue;
        }

        println!("{} Running {} tests...", "→".blue(), module_name.bold());

        let mut cmd = Command::new("cargo");
        cmd.arg("test").arg("--lib").arg(module_path);

        match execute_command(&mut cmd) {
            Ok(_) => println!("{} {} tests passed\n", "✓".green(), module_name),
            Err(_) => {
                println!("{} {} tests failed\n", "✗".red(), module_name);
                failed.push(module_name);
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Module tests failed: {}", failed.join(", "))
    }
}

fn run_scenario(trace: Option<&str>, commands: &[String], release: bool) -> Result<()> {
    println!("{}", "=== DMA Scenario ===".bold().blue());

    if commands.is_empty() {
        println!("{} Commands: {}", "→".blue(), "reference".bold());
    } else {
        println!("{} Commands: {}", "→".blue(), commands.join(", ").bold());
    }
    if let Some(path) = trace {
        println!("{} Trace: {}", "→".blue(), path.cyan());
    }
    println!();

    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.arg("run").arg("--bin").arg("ttdma");

    if release {
        cmd.arg("--release");
    }

    cmd.arg("--");
    for command in commands {
        cmd.arg("--command").arg(command);
    }
    if let Some(path) = trace {
        cmd.arg("--trace").arg(path);
    }

    if let Err(e) = execute_command(&mut cmd) {
        println!("\n{} Scenario failed", "✗".red().bold());
        return Err(e);
    }

    let elapsed = start.elapsed();
    println!(
        "\n{} Scenario completed in {}",
        "✓".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);

    let start = Instant::now();

    match task() {
        Ok(_) => {
            let elapsed = start.elapsed();
            println!(
                "{} {}",
                "✓".green().bold(),
                if verbose {
                    format!("({:.2}s)", elapsed.as_secs_f64())
                } else {
                    String::new()
                }
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
