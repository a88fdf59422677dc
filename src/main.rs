//! Cambio - terminal currency converter
//!
//! A Rust core implementing the data-fetching and state-coordination
//! layer of a currency converter, driven here by a minimal line-oriented
//! front-end.

mod beacon;
mod converter;
mod display;
mod input;
mod query;
mod runtime;

use beacon::{BeaconClient, BeaconConfig, CurrencySource, LoggingSource};
use converter::{ConverterState, Event};
use display::{
    conversion_view, currency_label, ConversionView, LOADING_MESSAGE, PLACEHOLDER_MESSAGE,
};
use query::CachePolicy;
use runtime::ConverterRuntime;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stderr keeps log lines out of the rendered view
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cambio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Configuration
    let config = BeaconConfig::from_env();
    if config.api_key.is_none() {
        tracing::warn!("No currency API key configured. Set CURRENCY_API_KEY.");
    }

    let client: Arc<dyn CurrencySource> = Arc::new(BeaconClient::new(&config));
    let source = Arc::new(LoggingSource::new(client));

    let mut runtime = ConverterRuntime::new(source, CachePolicy::default());
    runtime.apply(Event::Started);

    println!("cambio - currency converter");
    print_help();
    render(runtime.state());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&mut runtime, line.trim()) {
                    break;
                }
            }
            () = runtime.tick() => {}
        }
        render(runtime.state());
    }

    Ok(())
}

/// Apply one input line to the runtime. Returns false when the user quits.
fn handle_line(runtime: &mut ConverterRuntime<LoggingSource>, line: &str) -> bool {
    match line.split_once(' ') {
        Some(("from", code)) => runtime.apply(Event::FromSelected(code.trim().to_uppercase())),
        Some(("to", code)) => runtime.apply(Event::ToSelected(code.trim().to_uppercase())),
        Some(("amount", text)) => {
            runtime.apply(Event::AmountEdited(text.trim().to_string()));
            runtime.apply(Event::AmountCommitted);
        }
        None if line == "swap" => runtime.apply(Event::Swapped),
        None if line == "currencies" => print_catalog(runtime.state()),
        None if line == "help" => print_help(),
        None if line == "quit" || line == "exit" => return false,
        None if line.is_empty() => {}
        _ => println!("Unknown command. Type 'help' for the command list."),
    }
    true
}

fn print_help() {
    println!("Commands:");
    println!("  from <CODE>    select the source currency");
    println!("  to <CODE>      select the target currency");
    println!("  amount <TEXT>  set the amount to convert");
    println!("  swap           exchange the selected currencies");
    println!("  currencies     list the available currencies");
    println!("  quit           exit");
}

fn print_catalog(state: &ConverterState) {
    if state.catalog.is_loading {
        println!("Loading currencies...");
        return;
    }
    if let Some(catalog) = state.catalog.data.as_ref() {
        for currency in catalog.iter() {
            println!("  {}", currency_label(currency));
        }
    } else {
        println!("No currencies loaded.");
    }
}

/// Print the current selection and the conversion panel
fn render(state: &ConverterState) {
    if let Some(error) = &state.catalog.error {
        println!("! {}", error.message);
    }

    let from_code = code_or_placeholder(&state.from_code);
    let to_code = code_or_placeholder(&state.to_code);
    let amount = if state.amount.is_empty() {
        "-"
    } else {
        state.amount.as_str()
    };
    println!();
    println!("[{from_code} -> {to_code}]  amount: {amount}");

    let from = state.from_currency();
    let to = state.to_currency();
    match conversion_view(&state.conversion, from.as_ref(), to.as_ref()) {
        ConversionView::Loading => println!("{LOADING_MESSAGE}"),
        ConversionView::Error(message) => println!("Error: {message}"),
        ConversionView::Ready {
            headline,
            rate_line,
            updated_line,
        } => {
            println!("{headline}");
            println!("{rate_line}");
            println!("{updated_line}");
        }
        ConversionView::Placeholder => println!("{PLACEHOLDER_MESSAGE}"),
    }
    println!();
}

fn code_or_placeholder(code: &str) -> &str {
    if code.is_empty() {
        "?"
    } else {
        code
    }
}
