use clap::Parser;
use outdoor_billing::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Every request is awaited in turn, so a single-threaded runtime is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Failed to create async runtime: {}", e);
            process::exit(1);
        });

    match runtime.block_on(commands::run(args)) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Outdoor Billing - Activity Planner and Billing Dashboard");
    println!("========================================================");
    println!();
    println!("Find the best upcoming times to be outside from the local forecast,");
    println!("or review what each patient owes after insurance.");
    println!();
    println!("USAGE:");
    println!("    outdoor-billing <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    weather     List forecast slots matching your preferences, plus headlines");
    println!("    billing     Build, filter, chart and export the patient billing summary");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Mild, dry, clear or cloudy weather:");
    println!("    outdoor-billing weather --temp-min 55 --temp-max 75 \\");
    println!("                            --humidity-max 60 --condition Clear,Clouds");
    println!();
    println!("    # Billing summary for one doctor, exported to the download directory:");
    println!("    outdoor-billing billing --doctors doctors.csv --insurance insurance.csv \\");
    println!("                            --patients patients.csv --doctor A --export");
    println!();
    println!("For detailed help on any command, use:");
    println!("    outdoor-billing <COMMAND> --help");
}
