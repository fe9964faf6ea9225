use serde::Serialize;

use crate::config::Settings;
use crate::damage::{calculate, DamageCalculationRequest};
use crate::logging::init_logging;
use crate::server;

const USAGE: &str = "usage: dokkan-calc <serve|calculate|characters>";
const CALCULATE_USAGE: &str = "usage: dokkan-calc calculate <character_id> <def_stat> <leader_multiplier> <enemy_attack> [attack_count]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Calculate,
    Characters,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("calculate") => Some(Command::Calculate),
        Some("characters") => Some(Command::Characters),
        _ => None,
    }
}

pub async fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };

    let settings = Settings::from_env();
    init_logging(&settings.log_level);

    match command {
        Command::Serve => handle_serve(settings).await,
        Command::Calculate => handle_calculate(settings, args).await,
        Command::Characters => handle_characters(settings).await,
    }
}

async fn handle_serve(settings: Settings) -> i32 {
    match server::run_server(settings).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

async fn handle_calculate(settings: Settings, args: &[String]) -> i32 {
    let request = match parse_calculate_args(&args[2..]) {
        Ok(request) => request,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{CALCULATE_USAGE}");
            return 2;
        }
    };

    if let Err(issues) = request.validate() {
        eprintln!("validation failed: {} issue(s)", issues.len());
        for issue in issues {
            eprintln!("- {}: {}", issue.field, issue.messages.join("; "));
        }
        return 2;
    }

    let state = server::build_state(settings);
    let character = state.repository.get_character(&request.character_id).await;
    state.repository.close().await;

    let Some(character) = character else {
        eprintln!("character '{}' not found", request.character_id);
        return 1;
    };

    print_json(&calculate(&request, &character))
}

async fn handle_characters(settings: Settings) -> i32 {
    let state = server::build_state(settings);
    let characters = state.repository.get_characters().await;
    state.repository.close().await;
    print_json(&characters)
}

fn parse_calculate_args(args: &[String]) -> Result<DamageCalculationRequest, String> {
    if !(4..=5).contains(&args.len()) {
        return Err(format!("expected 4 or 5 arguments, got {}", args.len()));
    }

    let attack_count = match args.get(4) {
        Some(raw) => Some(parse_arg::<i64>(raw, "attack_count")?),
        None => None,
    };

    Ok(DamageCalculationRequest {
        character_id: args[0].clone(),
        def_stat: parse_arg(&args[1], "def_stat")?,
        leader_skill_multiplier: parse_arg(&args[2], "leader_multiplier")?,
        enemy_attack: parse_arg(&args[3], "enemy_attack")?,
        attack_count,
    })
}

fn parse_arg<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, String> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| format!("invalid {name} '{raw}'"))
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}
