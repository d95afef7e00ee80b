use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use virtual_pet::display;
use virtual_pet::llm::{LlmClient, OpenAiClient};
use virtual_pet::names::suggest_name;
use virtual_pet::{Action, Config, PetEngine};

#[derive(Parser)]
#[command(name = "virtual-pet")]
#[command(about = "A virtual pet whose adventures are narrated by an LLM")]
#[command(version)]
struct Cli {
    /// Directory holding config.json and pet_data.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pet types you can adopt
    Pets,
    /// Adopt a new pet
    Adopt {
        /// Pet name; a suggestion is picked when omitted
        #[arg(short, long)]
        name: Option<String>,
        /// Pet type key or display name
        #[arg(short = 't', long = "type", default_value = "cat")]
        pet_type: String,
    },
    /// Show your pet's stats, mood and pending event
    Status,
    /// Feed your pet
    Feed,
    /// Play with your pet
    Play,
    /// Let your pet rest
    Rest,
    /// Answer the pending event (options are numbered from 1)
    Choose { option: usize },
    /// Ask for a pet-care tip
    Tip,
    /// Forget your pet and start over
    Reset,
    /// Interactive session
    Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::new(cli.data_dir)?;
    let llm = OpenAiClient::from_settings(&config.llm)?.map(|client| Arc::new(client) as Arc<dyn LlmClient>);
    let mut engine = PetEngine::new(config, llm)?;
    engine.load().await?;

    match cli.command {
        Commands::Pets => print_pets(&engine),
        Commands::Adopt { name, pet_type } => {
            let name = name.unwrap_or_else(|| suggest_name(&pet_type, &mut rand::rng()).to_string());
            engine.adopt(&name, &pet_type).await?;
            print_status(&engine);
        }
        Commands::Status => print_status(&engine),
        Commands::Feed => act(&mut engine, Action::Feed).await?,
        Commands::Play => act(&mut engine, Action::Play).await?,
        Commands::Rest => act(&mut engine, Action::Rest).await?,
        Commands::Choose { option } => choose(&mut engine, option).await?,
        Commands::Tip => tip(&engine).await?,
        Commands::Reset => {
            engine.reset().await?;
            println!("🔄 Your pet has been reset. Adopt a new one with `virtual-pet adopt`.");
        }
        Commands::Shell => shell(&mut engine).await?,
    }

    Ok(())
}

fn print_pets(engine: &PetEngine) {
    println!("Available pets:");
    for (key, name) in engine.catalog().available() {
        println!("  {:<10} {}", key, name);
    }
}

fn print_status(engine: &PetEngine) {
    if !engine.is_adopted() {
        println!("🐾 Welcome to Virtual Pet! Adopt a pet with `adopt --name <name> --type <type>`.");
        return;
    }

    let session = engine.session();
    println!("🐾 {}'s Great Adventure", session.pet_name);
    println!();
    println!("{}", display::stats_block(&session.pet_state, engine.config().stats.bounds.max));
    if let Some(path) = engine.image_path() {
        println!("Image: {}", path);
    }
    println!();

    match engine.current_event() {
        Some(event) => print!("{}", display::event_block(event)),
        None => println!("{} looks {}!", session.pet_name, engine.mood()),
    }

    if !engine.is_llm_available() {
        println!("\n(Set OPENAI_API_KEY to enable events.)");
    }
}

async fn act(engine: &mut PetEngine, action: Action) -> Result<()> {
    engine.perform_action(action).await?;
    print_status(engine);
    Ok(())
}

async fn choose(engine: &mut PetEngine, option: usize) -> Result<()> {
    let index = option.checked_sub(1).context("Options are numbered from 1")?;
    let outcome = engine.choose_option(index).await?;

    let effects = display::effect_summary(&outcome.chosen.effect);
    if effects.is_empty() {
        println!("You chose: {}", outcome.chosen.text);
    } else {
        println!("You chose: {} ({})", outcome.chosen.text, effects);
    }
    println!();
    print_status(engine);
    Ok(())
}

async fn tip(engine: &PetEngine) -> Result<()> {
    match engine.tip().await? {
        Some(tip) => println!("💡 {}", display::tip_block(&tip)),
        None => println!("No tip available right now."),
    }
    Ok(())
}

const SHELL_HELP: &str = "Commands: feed, play, rest, <number> to choose, tip, status, pets, adopt <type> [name], reset, help, quit";

async fn shell(engine: &mut PetEngine) -> Result<()> {
    print_status(engine);
    println!("\n{}", SHELL_HELP);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        let result = match command.to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "help" | "?" => {
                println!("{}", SHELL_HELP);
                Ok(())
            }
            "status" | "s" => {
                print_status(engine);
                Ok(())
            }
            "pets" => {
                print_pets(engine);
                Ok(())
            }
            "tip" => tip(engine).await,
            "reset" => engine.reset().await.map(|_| println!("🔄 Pet reset.")),
            "adopt" => {
                let pet_type = words.next().unwrap_or("cat").to_string();
                let name = words
                    .next()
                    .map(str::to_string)
                    .unwrap_or_else(|| suggest_name(&pet_type, &mut rand::rng()).to_string());
                match engine.adopt(&name, &pet_type).await {
                    Ok(()) => {
                        print_status(engine);
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
            other => match other.parse::<usize>() {
                Ok(option) => choose(engine, option).await,
                Err(_) => match other.parse::<Action>() {
                    Ok(action) => act(engine, action).await,
                    Err(_) => {
                        println!("Unknown command '{}'. {}", other, SHELL_HELP);
                        Ok(())
                    }
                },
            },
        };

        if let Err(e) = result {
            println!("❌ {:#}", e);
        }
    }

    println!("👋 Bye!");
    Ok(())
}
