use anyhow::Result;
use clap::Parser;
use picslide::cli::Cli;
use picslide::error::ScriptError;

fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Run the main application logic from the library. Only the expected
    // failure category is handled here; everything else propagates to the
    // runtime's default unhandled-failure path.
    if let Err(e) = picslide::run(&cli) {
        return match e.downcast::<ScriptError>() {
            Ok(script_error) => {
                eprintln!("ScriptError: {script_error}");
                std::process::exit(1);
            }
            Err(other) => Err(other),
        };
    }

    Ok(())
}
