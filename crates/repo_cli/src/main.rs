use std::path::PathBuf;
use std::process;

use clap::Parser;
use repo_core::core_api::{Editor, PlayerRoster, PlayerUpgrades};
use serde_json::{Map as JsonMap, Value as JsonValue};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.ES3")]
    path: PathBuf,
    #[arg(long)]
    info: bool,
    #[arg(long)]
    world: bool,
    #[arg(long)]
    players: bool,
    /// Print the decrypted save document as JSON text.
    #[arg(long)]
    dump: bool,
    #[arg(long)]
    json: bool,
    #[arg(long = "set-team-name")]
    set_team_name: Option<String>,
    #[arg(long = "set-level")]
    set_level: Option<i64>,
    #[arg(long = "set-currency")]
    set_currency: Option<i64>,
    #[arg(long = "set-lives")]
    set_lives: Option<i64>,
    #[arg(long = "set-charging-station")]
    set_charging_station: Option<i64>,
    #[arg(long = "set-total-haul")]
    set_total_haul: Option<i64>,
    /// Player id the --set-health/--set-upgrade edits apply to.
    #[arg(long, value_name = "PLAYER_ID")]
    player: Option<String>,
    #[arg(long = "set-health")]
    set_health: Option<i64>,
    /// Repeatable, e.g. --set-upgrade speed=2.
    #[arg(long = "set-upgrade", value_name = "NAME=VALUE")]
    set_upgrade: Vec<String>,
    #[arg(long)]
    output: Option<PathBuf>,
    /// Gzip-frame the written plaintext (the game accepts both).
    #[arg(long)]
    compress: bool,
}

impl Cli {
    fn has_world_edit(&self) -> bool {
        self.set_team_name.is_some()
            || self.set_level.is_some()
            || self.set_currency.is_some()
            || self.set_lives.is_some()
            || self.set_charging_station.is_some()
            || self.set_total_haul.is_some()
    }

    fn has_player_edit(&self) -> bool {
        self.set_health.is_some() || !self.set_upgrade.is_empty()
    }

    fn has_edit(&self) -> bool {
        self.has_world_edit() || self.has_player_edit()
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.has_edit() && cli.output.is_none() {
        eprintln!("--set-* flags require --output <PATH>");
        process::exit(2);
    }
    if cli.output.is_some() && !cli.has_edit() {
        eprintln!("--output requires at least one --set-* flag");
        process::exit(2);
    }
    if cli.compress && cli.output.is_none() {
        eprintln!("--compress requires --output <PATH>");
        process::exit(2);
    }
    if cli.has_player_edit() && cli.player.is_none() {
        eprintln!("--set-health/--set-upgrade require --player <PLAYER_ID>");
        process::exit(2);
    }
    if cli.player.is_some() && !cli.has_player_edit() {
        eprintln!("--player requires --set-health or --set-upgrade");
        process::exit(2);
    }

    let upgrade_edits = match parse_upgrade_args(&cli.set_upgrade) {
        Ok(edits) => edits,
        Err(message) => {
            eprintln!("{message}");
            process::exit(2);
        }
    };

    let mut editor = Editor::new();
    if let Err(e) = editor.open_save_file(&cli.path) {
        eprintln!("Error opening {}: {e}", cli.path.display());
        process::exit(1);
    }

    if cli.has_world_edit() {
        apply_world_edits(&mut editor, &cli);
    }
    if cli.has_player_edit() {
        apply_player_edits(&mut editor, &cli, &upgrade_edits);
    }
    if let Some(output) = &cli.output {
        let result = if cli.compress {
            editor.save_file_compressed(output)
        } else {
            editor.save_file(output)
        };
        if let Err(e) = result {
            eprintln!("Error writing {}: {e}", output.display());
            process::exit(1);
        }
    }

    print_reads(&editor, &cli);
}

fn apply_world_edits(editor: &mut Editor, cli: &Cli) {
    let world = match editor.world() {
        Ok(Some(world)) => world,
        Ok(None) => {
            eprintln!("Error: world data is unavailable in this save");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error reading world data: {e}");
            process::exit(1);
        }
    };

    let mut record = world;
    if let Some(team_name) = &cli.set_team_name {
        record.team_name = team_name.clone();
    }
    if let Some(level) = cli.set_level {
        record.level = level;
    }
    if let Some(currency) = cli.set_currency {
        record.currency = currency;
    }
    if let Some(lives) = cli.set_lives {
        record.lives = lives;
    }
    if let Some(charging_station) = cli.set_charging_station {
        record.charging_station = charging_station;
    }
    if let Some(total_haul) = cli.set_total_haul {
        record.total_haul = total_haul;
    }

    if let Err(e) = editor.update_world(&record) {
        eprintln!("Error applying world edit: {e}");
        process::exit(1);
    }
}

fn apply_player_edits(editor: &mut Editor, cli: &Cli, upgrade_edits: &[(String, i64)]) {
    // Usage checks guarantee --player is present here.
    let Some(id) = cli.player.as_deref() else {
        eprintln!("--set-health/--set-upgrade require --player <PLAYER_ID>");
        process::exit(2);
    };

    let roster = match editor.players() {
        Ok(roster) => roster,
        Err(e) => {
            eprintln!("Error reading player data: {e}");
            process::exit(1);
        }
    };
    let Some(current) = roster.players.iter().find(|p| p.id == id) else {
        eprintln!("Error: player {id} is not fully present in this save");
        process::exit(1);
    };

    let mut health = current.health;
    let mut upgrades = current.upgrades;
    if let Some(new_health) = cli.set_health {
        health = new_health;
    }
    for (name, value) in upgrade_edits {
        upgrades.set(name, *value);
    }

    if let Err(e) = editor.update_player(id, health, &upgrades) {
        eprintln!("Error applying player edit: {e}");
        process::exit(1);
    }
}

fn print_reads(editor: &Editor, cli: &Cli) {
    if cli.dump {
        match editor.dump_plaintext() {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error dumping save document: {e}");
                process::exit(1);
            }
        }
    }

    let mut info = cli.info;
    let world = cli.world;
    let players = cli.players;
    if !info && !world && !players && !cli.dump && !cli.has_edit() {
        // Bare invocation prints the summary.
        info = true;
    }
    if !info && !world && !players {
        return;
    }

    if cli.json {
        print_json(editor, info, world, players);
    } else {
        print_pairs(editor, info, world, players);
    }
}

fn print_pairs(editor: &Editor, info: bool, world: bool, players: bool) {
    let mut out: Vec<(&'static str, String)> = Vec::new();

    if info {
        match query(editor.file_info()) {
            Some(info) => {
                out.push(("team_name", info.team_name));
                out.push(("player_count", info.player_count.to_string()));
                out.push(("level", info.level.to_string()));
                out.push(("currency", info.currency.to_string()));
                out.push(("lives", info.lives.to_string()));
            }
            None => out.push(("info", "unavailable".to_string())),
        }
    }
    if world {
        match query(editor.world()) {
            Some(world) => {
                out.push(("team_name", world.team_name));
                out.push(("level", world.level.to_string()));
                out.push(("currency", world.currency.to_string()));
                out.push(("lives", world.lives.to_string()));
                out.push(("charging_station", world.charging_station.to_string()));
                out.push(("total_haul", world.total_haul.to_string()));
            }
            None => out.push(("world", "unavailable".to_string())),
        }
    }
    if players {
        let roster = query_roster(editor);
        for player in &roster.players {
            out.push((
                "player",
                format!(
                    "{} name={} health={} upgrades={}",
                    player.id,
                    player.name,
                    player.health,
                    format_upgrades(&player.upgrades)
                ),
            ));
        }
        for skipped in &roster.skipped {
            out.push(("skipped", format!("{} reason={}", skipped.id, skipped.reason)));
        }
    }

    for (key, value) in out {
        println!("{key}={value}");
    }
}

fn print_json(editor: &Editor, info: bool, world: bool, players: bool) {
    let mut out = JsonMap::new();

    if info {
        out.insert("info".to_string(), serde_json::json!(query(editor.file_info())));
    }
    if world {
        out.insert("world".to_string(), serde_json::json!(query(editor.world())));
    }
    if players {
        out.insert("players".to_string(), serde_json::json!(query_roster(editor)));
    }

    match serde_json::to_string_pretty(&JsonValue::Object(out)) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error encoding JSON output: {e}");
            process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn parse_upgrade_args(args: &[String]) -> Result<Vec<(String, i64)>, String> {
    let mut edits = Vec::with_capacity(args.len());
    let mut probe = PlayerUpgrades::default();
    for arg in args {
        let Some((name, value)) = arg.split_once('=') else {
            return Err(format!("invalid --set-upgrade '{arg}', expected NAME=VALUE"));
        };
        let value: i64 = value
            .parse()
            .map_err(|_| format!("invalid --set-upgrade value in '{arg}', expected an integer"))?;
        if !probe.set(name, value) {
            return Err(format!(
                "unknown upgrade field '{name}', expected one of: health, stamina, extra_jump, \
                 launch, map_player_count, speed, strength, range, throw"
            ));
        }
        edits.push((name.to_string(), value));
    }
    Ok(edits)
}

fn query<T>(result: Result<Option<T>, repo_core::core_api::SaveError>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error reading save data: {e}");
            process::exit(1);
        }
    }
}

fn query_roster(editor: &Editor) -> PlayerRoster {
    match editor.players() {
        Ok(roster) => roster,
        Err(e) => {
            eprintln!("Error reading player data: {e}");
            process::exit(1);
        }
    }
}

fn format_upgrades(upgrades: &PlayerUpgrades) -> String {
    upgrades
        .named()
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join(",")
}
