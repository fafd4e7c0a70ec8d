//! Conversate CLI - Multi-Persona Chat
//!
//! A command-line front-end for chatting with a panel of fixed personas.
//! A language model picks which persona answers each message, and the reply
//! is synthesized to audio in that persona's voice.

use clap::Parser;
use colored::Colorize;
use conversate_core::{
    ChatEvent, ChatOrchestrator, Config, ModelResponder, ModelSettings, SendOutcome,
    SpeechApiClient, default_config,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "conversate",
    version,
    about = "Chat with a panel of AI personas",
    long_about = "An interactive chat where a language model answers as one of several fixed \
                  personas, with each reply synthesized to audio in that persona's voice."
)]
struct Cli {
    /// Display name used for your messages
    #[arg(value_name = "NAME")]
    name: String,

    /// Path to a TOML configuration file (built-in demo panel when omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Model used to pick a speaker and write replies (overrides the config)
    #[arg(short, long, value_name = "MODEL")]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => default_config(),
    };

    // Get API configuration from environment
    let api_base = env::var("OPENAI_API_BASE")
        .or_else(|_| env::var("OPENAI_BASE_URL"))
        .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

    let api_key = env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
        eprintln!(
            "{}",
            "Warning: OPENAI_API_KEY not set. API calls may fail.".yellow()
        );
        String::new()
    });

    let speech_api_key = env::var("SPEECH_API_KEY").unwrap_or_else(|_| {
        eprintln!(
            "{}",
            "Warning: SPEECH_API_KEY not set. Speech synthesis may fail.".yellow()
        );
        String::new()
    });

    let model = cli.model.unwrap_or_else(|| config.chat.model.clone());

    let responder = ModelResponder::new(ModelSettings {
        api_base,
        api_key,
        model,
        max_tokens: config.chat.max_tokens,
        prompt_template: config.prompts.turn_prompt.clone(),
    });

    let synthesizer =
        SpeechApiClient::new(&config.speech.endpoint, speech_api_key, &config.speech.format)?;

    // Print header
    println!();
    println!("{}", "═".repeat(70).bright_blue());
    println!(
        "{}",
        format!("  {}", "Conversate".bold()).bright_blue().bold()
    );
    println!("{}", "═".repeat(70).bright_blue());
    println!();
    println!("{}", "Participants:".bold());
    for (i, p) in config.participants.iter().enumerate() {
        println!("  {}. {}", i + 1, p.name.bright_cyan());
    }
    println!("  {}. {} (you)", config.participants.len() + 1, cli.name);
    println!();
    println!(
        "{}",
        "Type a message and press Enter. Type 'exit' to leave.".dimmed()
    );
    println!("{}", "─".repeat(70).dimmed());

    let orchestrator = ChatOrchestrator::new(
        config.participants.clone(),
        &cli.name,
        Box::new(responder),
        Box::new(synthesizer),
    )?
    .with_callback(create_console_callback());

    orchestrator.greet(&config.prompts.greeting);

    let stdin = io::stdin();
    loop {
        print!("{} ", format!("{}>", cli.name).bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        // The callback renders replies and failure notices; nothing is
        // printed for ignored or dropped input.
        let _outcome: SendOutcome = orchestrator.send(line).await;
    }

    println!();
    println!("{}", "═".repeat(70).bright_blue());
    println!("{}", "  Conversation ended.".bright_green().bold());
    println!("{}", "═".repeat(70).bright_blue());
    println!();

    Ok(())
}

/// Create a callback that prints chat events to the console.
fn create_console_callback() -> Box<dyn Fn(ChatEvent) + Send + Sync> {
    Box::new(move |event| match event {
        ChatEvent::UserMessage { .. } => {
            // The user's line is already on screen as typed input.
        }
        ChatEvent::AssistantMessage { message } => {
            println!();
            println!("{} {}", "▶".bright_cyan(), message.sender.bright_cyan().bold());
            let wrapped = textwrap(&message.content, 66);
            for line in wrapped.lines() {
                println!("  {}", line);
            }
            if let Some(url) = &message.audio_url {
                println!("  {}", format!("audio: {}", url).dimmed());
            }
            println!();
        }
        ChatEvent::TurnFailed { notice } => {
            println!("{}", notice.red());
        }
    })
}

/// Simple text wrapping function.
fn textwrap(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut current_line_len = 0;

    for word in text.split_whitespace() {
        if current_line_len + word.len() + 1 > width && current_line_len > 0 {
            result.push('\n');
            current_line_len = 0;
        }
        if current_line_len > 0 {
            result.push(' ');
            current_line_len += 1;
        }
        result.push_str(word);
        current_line_len += word.len();
    }

    result
}
