use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use quiz_forge::clients::{ClientType, FlexibleClient, GeminiConfig, GeminiModel, MockResponse};
use quiz_forge::console::{self, LineKind};
use quiz_forge::fetcher::QuizFetcher;
use quiz_forge::interceptors::FileInterceptor;
use quiz_forge::prompt::Difficulty;
use quiz_forge::quiz::payload_schema;
use quiz_forge::render::{QuizApp, Screen, UserEvent};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClientArg {
    Gemini,
    Mock,
}

impl From<ClientArg> for ClientType {
    fn from(arg: ClientArg) -> Self {
        match arg {
            ClientArg::Gemini => ClientType::Gemini,
            ClientArg::Mock => ClientType::Mock,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the JSON Schema of the quiz payload requested from the model
    Schema,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a 3-question MCQ quiz from pasted text", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    GOOGLE_API_KEY   API key for the Gemini client (also read from .env)
    GEMINI_MODEL     Model name [default: gemini-2.5-pro]
    GEMINI_BASE_URL  Override the Gemini endpoint base URL
    RUST_LOG         Log filter, e.g. quiz_forge=debug")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Read the source text from a file instead of pasting it
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Quiz difficulty
    #[arg(short, long, value_enum, default_value_t = Difficulty::Easy)]
    level: Difficulty,

    /// Model backend; `mock` serves a canned quiz without network access
    #[arg(short, long, value_enum, default_value_t = ClientArg::Gemini)]
    client: ClientArg,

    /// Gemini model name, overrides GEMINI_MODEL
    #[arg(short, long)]
    model: Option<String>,

    /// Write every prompt and raw response to this directory
    #[arg(long)]
    record_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

const DEMO_QUIZ: &str = r#"{"mcqs": [
  {"mcq": "What is the capital of France?", "options": {"a": "Paris", "b": "Lyon", "c": "Nice", "d": "Lille"}, "correct": "a"},
  {"mcq": "What is the capital of France?", "options": {"a": "Paris", "b": "Lyon", "c": "Nice", "d": "Lille"}, "correct": "a"},
  {"mcq": "What is the capital of France?", "options": {"a": "Paris", "b": "Lyon", "c": "Nice", "d": "Lille"}, "correct": "a"}
]}"#;

fn init_tracing(verbose: bool) {
    let default = if verbose { "quiz_forge=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn build_client(args: &Args) -> Result<FlexibleClient, Screen> {
    match ClientType::from(args.client) {
        ClientType::Gemini => {
            let mut config = GeminiConfig::from_env().map_err(|e| Screen::halted(e.to_string()))?;
            if let Some(model) = &args.model {
                config = config.with_model(GeminiModel::from_name(model));
            }
            Ok(FlexibleClient::gemini(config))
        }
        ClientType::Mock => {
            let (client, handle) = FlexibleClient::mock();
            handle.set_fallback(MockResponse::Success(DEMO_QUIZ.to_string()));
            Ok(client)
        }
    }
}

fn read_source<R: BufRead, W: Write>(args: &Args, input: &mut R, out: &mut W) -> anyhow::Result<String> {
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    if !io::stdin().is_terminal() {
        let mut text = String::new();
        input.read_to_string(&mut text).context("reading text from stdin")?;
        return Ok(text);
    }
    Ok(console::read_pasted_text(input, out)?)
}

fn read_level<R: BufRead, W: Write>(input: &mut R, out: &mut W, current: Difficulty) -> io::Result<Difficulty> {
    let choices: Vec<String> = Difficulty::ALL.iter().map(ToString::to_string).collect();
    let prompt = format!("Select quiz level ({}) [{}]: ", choices.join("/"), current);
    loop {
        let Some(answer) = console::prompt_line(input, out, &prompt)? else {
            return Ok(current);
        };
        if answer.trim().is_empty() {
            return Ok(current);
        }
        match answer.parse::<Difficulty>() {
            Ok(level) => return Ok(level),
            Err(e) => console::print_lines(out, &[(LineKind::Warning, e)])?,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(Command::Schema) = args.command {
        println!("{}", payload_schema());
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    console::print_lines(&mut out, &console::banner())?;

    let client = match build_client(&args) {
        Ok(client) => client,
        Err(halted) => {
            console::print_lines(&mut out, &console::screen_lines(&halted))?;
            return Ok(());
        }
    };

    let mut fetcher = QuizFetcher::new(client);
    if let Some(dir) = &args.record_dir {
        fetcher = fetcher.with_interceptor(Arc::new(FileInterceptor::new(dir.clone())));
    }
    let mut app = QuizApp::new(fetcher);

    let mut text = read_source(&args, &mut input, &mut out)?;
    let mut level = args.level;
    let mut event = UserEvent::Generate { text: text.clone(), level };

    loop {
        console::print_lines(&mut out, &[(LineKind::Plain, format!("Generating your {} quiz...", level))])?;
        let screen = app.dispatch(event).await;
        console::print_lines(&mut out, &console::screen_lines(&screen))?;

        event = loop {
            let menu = if screen.has_quiz() {
                "[s]ubmit answers, [g]enerate again, [l]evel, [t]ext, [q]uit: "
            } else {
                "[g]enerate again, [l]evel, [t]ext, [q]uit: "
            };
            let Some(choice) = console::prompt_line(&mut input, &mut out, menu)? else {
                return Ok(());
            };
            match choice.trim().to_lowercase().as_str() {
                "s" if screen.has_quiz() => {
                    let selections = console::collect_selections(&mut input, &mut out, &screen.questions)?;
                    let submitted = app.dispatch(UserEvent::Submit(selections)).await;
                    console::print_lines(&mut out, &console::screen_lines(&submitted))?;
                }
                "g" => break UserEvent::Generate { text: text.clone(), level },
                "l" => level = read_level(&mut input, &mut out, level)?,
                "t" => text = console::read_pasted_text(&mut input, &mut out)?,
                "q" => return Ok(()),
                _ => {}
            }
        };
    }
}
