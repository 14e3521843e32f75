//! Interactive terminal chat with the PROJ-BLE Education Assistant.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; the API key is read from GEMINI_API_KEY
//! edu-assistant-chat
//!
//! # Specify a model and a three-state theme cycle
//! edu-assistant-chat --model gemini-2.5-pro --themes light,dark,high-contrast
//!
//! # Read settings from a file, then disable colors
//! edu-assistant-chat --config assistant.yaml --no-color
//! ```
//!
//! # Commands
//!
//! - `/theme [name]` - Switch theme
//! - `/reset` - Start a new session
//! - `/stats` - Show session statistics
//! - `/config` - Show configuration
//! - `/help` - Show available commands
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::error::ReadlineError;
use rustyline::{
    Cmd, ConditionalEventHandler, DefaultEditor, Event, EventContext, EventHandler, KeyCode,
    KeyEvent, Modifiers,
};

use edu_assistant::GeminiSession;
use edu_assistant::chat::prompt::{ASSISTANT_TAGLINE, ASSISTANT_TITLE, INPUT_PLACEHOLDER};
use edu_assistant::chat::{
    ChatApp, ChatArgs, ChatCommand, ChatConfig, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use edu_assistant::input::{InputController, KeyOutcome};

/// Routes Enter and Alt-Enter through [`InputController::handle_enter`].
///
/// The prompt is only read between replies, so the input is never loading
/// here.
struct EnterKeys;

impl ConditionalEventHandler for EnterKeys {
    fn handle(&self, evt: &Event, _n: u16, _positive: bool, ctx: &EventContext) -> Option<Cmd> {
        let Event::KeySeq(keys) = evt else {
            return None;
        };
        let modifier = match keys.first()? {
            KeyEvent(KeyCode::Enter, modifiers) => *modifiers != Modifiers::NONE,
            _ => return None,
        };
        let mut input = InputController::new();
        input.set_text(ctx.line());
        Some(match input.handle_enter(modifier, false) {
            KeyOutcome::Submitted(_) => Cmd::AcceptLine,
            KeyOutcome::Newline => Cmd::Newline,
            KeyOutcome::Ignored => Cmd::Noop,
        })
    }
}

/// Main entry point for the edu-assistant-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = ChatArgs::from_command_line_relaxed("edu-assistant-chat [OPTIONS]");
    if !free.is_empty() {
        eprintln!("unexpected arguments: {}", free.join(" "));
        std::process::exit(2);
    }
    let config = ChatConfig::from_args(args)?;

    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut app = ChatApp::new(config.model.clone(), config.theme_cycle()?);
    renderer.set_theme(app.theme());

    println!("{ASSISTANT_TITLE}");
    println!("{ASSISTANT_TAGLINE}");
    println!("Type /help for commands, /quit to exit\n");

    start_session(&mut app, &config, &mut renderer);

    let mut rl = DefaultEditor::new()?;
    for modifiers in [Modifiers::NONE, Modifiers::ALT] {
        rl.bind_sequence(
            KeyEvent(KeyCode::Enter, modifiers),
            EventHandler::Conditional(Box::new(EnterKeys)),
        );
    }
    let mut input = InputController::new();
    renderer.print_info(INPUT_PLACEHOLDER);

    loop {
        match rl.readline("You: ") {
            Ok(line) => {
                input.set_text(line);

                if let Some(cmd) = parse_command(input.text()) {
                    input.clear();
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Theme(name) => {
                            let changed = match name {
                                Some(name) => app.select_theme(&name),
                                None => {
                                    app.toggle_theme();
                                    true
                                }
                            };
                            if changed {
                                renderer.set_theme(app.theme());
                                renderer.print_info(&format!("Theme: {}", app.theme().name()));
                            } else {
                                let names: Vec<_> =
                                    app.themes().variants().iter().map(|t| t.name()).collect();
                                renderer.print_error(&format!(
                                    "Unknown theme; available: {}",
                                    names.join(", ")
                                ));
                            }
                        }
                        ChatCommand::Reset => {
                            start_session(&mut app, &config, &mut renderer);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Stats => {
                            println!("    Session Statistics:");
                            for line in app.stats().to_string().lines() {
                                println!("      {}", line);
                            }
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&config);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                let Some(text) = input.submit(app.is_loading()) else {
                    continue;
                };
                let _ = rl.add_history_entry(text.as_str());
                app.send(&text, &mut renderer).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

/// Opens a session from `config` and shows the message it was seeded with.
fn start_session(app: &mut ChatApp, config: &ChatConfig, renderer: &mut dyn Renderer) {
    match config.build_client() {
        Ok(client) => app.connect(&client, &config.system_instruction),
        Err(err) => app.initialize::<GeminiSession>(Err(err)),
    }
    if let Some(message) = app.conversation().last() {
        renderer.print_message(message);
    }
}

fn print_config(config: &ChatConfig) {
    println!("    Current Configuration:");
    println!("      Model: {}", config.model);
    println!("      API key variable: {}", config.api_key_var);
    println!(
        "      Base URL: {}",
        config.base_url.as_deref().unwrap_or("(default)")
    );
    println!("      Timeout: {}s", config.timeout_secs);
    println!("      Themes: {}", config.themes.join(", "));
    println!(
        "      Color: {}",
        if config.use_color { "on" } else { "off" }
    );
    let first_line = config.system_instruction.lines().next().unwrap_or("");
    println!("      System instruction: {}", first_line);
}
