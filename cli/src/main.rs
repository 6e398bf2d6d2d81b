//! # 2048 CLI
//!
//! Command-line interface for playing 2048 interactively or running
//! headless simulations with configurable policies.

use clap::{Parser, ValueEnum};
use log::{debug, info};
use puzzle_2048_core::{Command, Direction, Game};
use std::io::{self, Read, Write};

mod logging;

#[derive(Parser, Debug)]
#[command(name = "puzzle-2048")]
#[command(author, version, about = "Play 2048 in the terminal or run simulations")]
struct Args {
    /// Number of episodes to run in headless mode (omit for interactive play)
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Maximum steps per episode (0 = unlimited)
    #[arg(short, long, default_value = "10000")]
    max_steps: u32,

    /// Policy for headless mode
    #[arg(short, long, value_enum, default_value = "random")]
    policy: Policy,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Uniformly random moves drawn from the engine RNG
    Random,
    /// Greedy one-ply auto-play
    Auto,
}

fn main() {
    logging::init_logging();
    let args = Args::parse();

    if let Some(episodes) = args.episodes {
        run_headless(&args, episodes);
    } else {
        run_interactive(&args);
    }
}

/// Run interactive mode where the user plays with the keyboard.
fn run_interactive(args: &Args) {
    // Set terminal to raw mode for single-key input
    enable_raw_mode();

    let mut game = Game::new(args.seed);
    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];

    render(&game);

    loop {
        let bytes_read = stdin.read(&mut buffer).unwrap_or(0);
        if bytes_read == 0 {
            continue;
        }

        match parse_input(&buffer[..bytes_read]) {
            Key::Command(command) => {
                game.process_input(command);
                render(&game);
            }
            Key::Quit => {
                disable_raw_mode();
                println!("\nGoodbye!");
                break;
            }
            Key::None => {}
        }
    }
}

/// Run headless simulation mode.
fn run_headless(args: &Args, episodes: u32) {
    if episodes == 0 {
        println!("episodes=0");
        return;
    }

    let mut total_score: u64 = 0;
    let mut max_tile_overall: u32 = 0;
    let mut scores: Vec<u32> = Vec::with_capacity(episodes as usize);
    let mut max_tiles: Vec<u32> = Vec::with_capacity(episodes as usize);

    for episode in 0..episodes {
        let episode_seed = args.seed.wrapping_add(episode as u64);
        let mut game = Game::new(episode_seed);
        let mut steps = 0;

        while !game.is_lost() && !game.is_won() && (args.max_steps == 0 || steps < args.max_steps) {
            let command = match args.policy {
                Policy::Random => Command::RandomMove,
                Policy::Auto => Command::AutoMove,
            };
            game.process_input(command);
            steps += 1;
            debug!("episode {} step {}: score={}", episode + 1, steps, game.score());
        }

        let score = game.score();
        let max_tile = game.max_tile();

        scores.push(score);
        max_tiles.push(max_tile);
        total_score += score as u64;
        max_tile_overall = max_tile_overall.max(max_tile);

        info!(
            "episode {}: score={}, max_tile={}, steps={}, won={}",
            episode + 1,
            score,
            max_tile,
            steps,
            game.is_won()
        );
    }

    // Compute statistics
    let avg_score = total_score as f64 / episodes as f64;
    scores.sort();
    let median_score = if episodes % 2 == 0 {
        (scores[(episodes / 2 - 1) as usize] + scores[(episodes / 2) as usize]) as f64 / 2.0
    } else {
        scores[(episodes / 2) as usize] as f64
    };

    // Count tile distribution
    let mut tile_counts = std::collections::HashMap::new();
    for tile in &max_tiles {
        *tile_counts.entry(*tile).or_insert(0u32) += 1;
    }

    // Output results in parseable format
    println!("=== Simulation Results ===");
    println!("episodes={}", episodes);
    println!("policy={:?}", args.policy);
    println!("seed={}", args.seed);
    println!("max_steps={}", args.max_steps);
    println!("avg_score={:.2}", avg_score);
    println!("median_score={:.2}", median_score);
    println!("min_score={}", scores.first().unwrap_or(&0));
    println!("max_score={}", scores.last().unwrap_or(&0));
    println!("max_tile_overall={}", max_tile_overall);

    let mut tile_list: Vec<_> = tile_counts.iter().collect();
    tile_list.sort_by_key(|&(tile, _)| *tile);
    print!("tile_distribution=");
    for (i, (tile, count)) in tile_list.iter().enumerate() {
        if i > 0 {
            print!(",");
        }
        print!("{}:{}", tile, count);
    }
    println!();
}

enum Key {
    Command(Command),
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> Key {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => Key::Command(Command::Move(Direction::Up)),
        [27, 91, 66] => Key::Command(Command::Move(Direction::Down)),
        [27, 91, 67] => Key::Command(Command::Move(Direction::Right)),
        [27, 91, 68] => Key::Command(Command::Move(Direction::Left)),

        // Escape alone restarts the game
        [27] => Key::Command(Command::Reset),

        // Letter commands
        [b'z'] | [b'Z'] => Key::Command(Command::Undo),
        [b'r'] | [b'R'] => Key::Command(Command::RandomMove),
        [b'a'] | [b'A'] => Key::Command(Command::AutoMove),

        // Control keys
        [b'q'] | [b'Q'] | [3] => Key::Quit, // q, Q, Ctrl+C

        _ => Key::None,
    }
}

fn render(game: &Game) {
    println!("\x1b[2J\x1b[H"); // Clear screen
    println!("=== 2048 ===");
    println!("Arrows: move | Esc: restart | Z: undo | R: random | A: auto | Q: quit\n");
    print!("{}", game.board());

    if game.is_won() {
        println!("\n  *** YOU WIN ***");
        println!("  Press Esc to restart or Q to quit");
    } else if game.is_lost() {
        println!("\n  *** GAME OVER ***");
        println!("  Final Score: {}", game.score());
        println!("  Press Esc to restart or Q to quit");
    }
    io::stdout().flush().unwrap();
}

// Platform-specific terminal raw mode handling
#[cfg(unix)]
fn enable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(unix)]
fn disable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag |= libc::ICANON | libc::ECHO;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(not(unix))]
fn enable_raw_mode() {
    // On non-Unix systems, just continue without raw mode
    // Interactive mode will require Enter after each key
}

#[cfg(not(unix))]
fn disable_raw_mode() {}
