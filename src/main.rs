//! scholar-term - Main Entry Point
//!
//! Builds the OpenAlex gateway and hands it to the interactive prompter.

use std::io::IsTerminal;
use std::process;

use scholar_term::api::OpenAlexClient;
use scholar_term::cli::Prompter;

#[tokio::main]
async fn main() {
    let gateway = match OpenAlexClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("ERROR: could not initialize the HTTP client: {}", e);
            process::exit(1);
        }
    };

    let mut prompter = Prompter::new(gateway);
    if !std::io::stdout().is_terminal() {
        // Piped output: skip the typed animation.
        prompter = prompter.without_animation();
    }

    if let Err(e) = prompter.run().await {
        eprintln!("ERROR: terminal failure: {}", e);
        eprintln!("Please check your terminal compatibility and try again.");
        process::exit(1);
    }

    println!("Thanks for using scholar-term. Goodbye!");
}
