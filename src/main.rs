//! Flappy Gym entry point
//!
//! Three drivers share one simulation core: a keyboard-driven manual mode,
//! an automated policy mode and a headless random mode.

use std::io::{self, BufRead, Stdout, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::{cursor, execute, terminal};

use flappy_gym::driver::{self, RunConfig};
use flappy_gym::policy::{AutopilotPolicy, LinearPolicy, Policy, PolicyError, RandomPolicy};
use flappy_gym::render::{AsciiRenderer, JsonLinesSink, TerminalSink};
use flappy_gym::scoreboard::EpisodeRecord;
use flappy_gym::settings::DEFAULT_SETTINGS_FILE;
use flappy_gym::{Action, FlappyEnv, Scoreboard, Settings};

#[derive(Parser, Debug)]
#[command(name = "flappy-gym", version, about = "Flappy bird simulation and RL environment")]
struct Cli {
    /// Settings file (defaults to ./flappy-gym.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Simulation seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Ticks per second for the interactive drivers
    #[arg(long, global = true)]
    tps: Option<u32>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Text menu (default)
    Menu,
    /// Play with the keyboard
    Play,
    /// Watch a trained policy play
    Ai {
        /// Policy artifact to load
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Use the built-in autopilot instead of an artifact
        #[arg(long)]
        autopilot: bool,
        #[arg(long, default_value_t = 1)]
        episodes: u32,
    },
    /// Headless random agent
    Random {
        #[arg(long, default_value_t = 1)]
        episodes: u32,
        /// Cap on steps per episode
        #[arg(long)]
        max_steps: Option<u64>,
        /// Draw the playfield while running
        #[arg(long)]
        render: bool,
        /// Stream frames as JSON lines on stdout
        #[arg(long, conflicts_with = "render")]
        json: bool,
    },
}

/// Raw mode plus alternate screen, restored on drop
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let mut out = stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.out, terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::load_or_default(Path::new(DEFAULT_SETTINGS_FILE))?,
    };
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    if let Some(tps) = cli.tps {
        settings.ticks_per_second = tps;
    }
    settings.validate()?;
    Ok(settings)
}

fn run_config(settings: &Settings, paced: bool) -> RunConfig {
    RunConfig {
        max_steps: settings.max_steps,
        pace: paced.then(|| settings.tick_duration()),
        ticks_per_second: settings.ticks_per_second,
    }
}

/// What the player chose on the game over screen
enum AfterCrash {
    Restart,
    Quit,
}

fn wait_after_crash() -> Result<AfterCrash> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => return Ok(AfterCrash::Restart),
                KeyCode::Esc | KeyCode::Char('q') => return Ok(AfterCrash::Quit),
                _ => {}
            }
        }
    }
}

/// Keyboard driver: Space/Up flaps, Esc/q quits
fn play_manual(env: &mut FlappyEnv, settings: &Settings, board: &mut Scoreboard) -> Result<()> {
    let guard = TerminalGuard::enter()?;
    let mut sink = TerminalSink::new(guard.out.lock(), AsciiRenderer::default());
    let frame_dur = settings.tick_duration();

    'episodes: loop {
        env.reset();
        env.render(&mut sink)?;
        let mut total_reward = 0.0;

        loop {
            let frame_start = Instant::now();

            let mut action = Action::Noop;
            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') => break 'episodes,
                        KeyCode::Char(' ') | KeyCode::Up => action = Action::Flap,
                        _ => {}
                    }
                }
            }

            let step = env.step_action(action)?;
            total_reward += step.reward;
            env.render(&mut sink)?;

            if step.done {
                board.record(EpisodeRecord {
                    episode: env.state().episode,
                    score: env.score(),
                    ticks: env.state().time_ticks,
                    total_reward,
                });
                match wait_after_crash()? {
                    AfterCrash::Restart => continue 'episodes,
                    AfterCrash::Quit => break 'episodes,
                }
            }

            if let Some(rest) = frame_dur.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    drop(sink);
    drop(guard);
    Ok(())
}

fn load_policy(path: Option<PathBuf>, autopilot: bool, settings: &Settings) -> Result<Box<dyn Policy>> {
    if autopilot {
        return Ok(Box::new(AutopilotPolicy::default()));
    }
    let path = path.unwrap_or_else(|| settings.policy_path.clone());
    Ok(Box::new(LinearPolicy::load(&path)?))
}

/// Automated driver: load a policy and watch it play
fn play_ai(
    env: &mut FlappyEnv,
    settings: &Settings,
    board: &mut Scoreboard,
    policy_path: Option<PathBuf>,
    autopilot: bool,
    episodes: u32,
) -> Result<()> {
    let mut policy = load_policy(policy_path, autopilot, settings)?;
    log::info!("Running {} policy for {} episode(s)", policy.name(), episodes);

    let guard = TerminalGuard::enter()?;
    let mut sink = TerminalSink::new(guard.out.lock(), AsciiRenderer::default());
    driver::run_episodes(
        env,
        policy.as_mut(),
        Some(&mut sink),
        &run_config(settings, true),
        episodes,
        board,
    )?;
    drop(sink);
    drop(guard);
    Ok(())
}

/// Headless driver: random actions until each episode ends
fn play_random(
    env: &mut FlappyEnv,
    settings: &Settings,
    board: &mut Scoreboard,
    seed: u64,
    episodes: u32,
    render: bool,
    json: bool,
) -> Result<()> {
    let mut policy = RandomPolicy::new(seed);
    let config = run_config(settings, render);

    if render {
        let guard = TerminalGuard::enter()?;
        let mut sink = TerminalSink::new(guard.out.lock(), AsciiRenderer::default());
        driver::run_episodes(env, &mut policy, Some(&mut sink), &config, episodes, board)?;
    } else if json {
        let mut sink = JsonLinesSink::new(stdout().lock());
        driver::run_episodes(env, &mut policy, Some(&mut sink), &config, episodes, board)?;
    } else {
        let records = driver::run_episodes(env, &mut policy, None, &config, episodes, board)?;
        for r in &records {
            println!(
                "Episode {}: score {}, {} steps, total reward {:.1}",
                r.episode, r.score, r.ticks, r.total_reward
            );
        }
    }
    Ok(())
}

/// Run the automated driver, falling back to the menu when no usable
/// policy can be loaded
fn play_ai_or_fallback(
    env: &mut FlappyEnv,
    settings: &Settings,
    board: &mut Scoreboard,
    policy_path: Option<PathBuf>,
    autopilot: bool,
    episodes: u32,
) -> Result<bool> {
    match play_ai(env, settings, board, policy_path, autopilot, episodes) {
        Ok(()) => Ok(true),
        Err(err) => match err.downcast_ref::<PolicyError>() {
            Some(policy_err) => {
                log::error!("{policy_err}");
                println!("Could not load a policy: {policy_err}");
                println!("Train one first or start with `ai --autopilot`.");
                Ok(false)
            }
            None => Err(err),
        },
    }
}

fn menu(env: &mut FlappyEnv, settings: &Settings, board: &mut Scoreboard) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!();
        println!("=== Flappy Gym ===");
        println!("  1) Play");
        println!("  2) Watch AI");
        println!("  3) Random agent");
        println!("  q) Quit");
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        match line?.trim() {
            "1" => play_manual(env, settings, board)?,
            "2" => {
                play_ai_or_fallback(env, settings, board, None, false, 1)?;
            }
            "3" => play_random(env, settings, board, settings.resolve_seed(), 1, false, false)?,
            "q" | "Q" => return Ok(()),
            other => println!("Unknown option {other:?}"),
        }
        if !board.is_empty() {
            print!("{}", board.summary());
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let seed = settings.resolve_seed();
    log::info!("Flappy Gym starting with seed {seed}");
    let mut env = FlappyEnv::new(seed);
    let mut board = Scoreboard::new();

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => menu(&mut env, &settings, &mut board)?,
        Command::Play => play_manual(&mut env, &settings, &mut board)?,
        Command::Ai {
            policy,
            autopilot,
            episodes,
        } => {
            if !play_ai_or_fallback(&mut env, &settings, &mut board, policy, autopilot, episodes)? {
                menu(&mut env, &settings, &mut board)?;
            }
        }
        Command::Random {
            episodes,
            max_steps,
            render,
            json,
        } => {
            let settings = Settings {
                max_steps: max_steps.or(settings.max_steps),
                render: render || settings.render,
                ..settings
            };
            play_random(
                &mut env,
                &settings,
                &mut board,
                seed,
                episodes,
                settings.render && !json,
                json,
            )?;
        }
    }

    if !board.is_empty() {
        print!("{}", board.summary());
    }
    if let Some(mean) = board.mean_score() {
        log::info!("Mean score on the board: {mean:.2}");
    }
    Ok(())
}
