//! Command dispatch

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::{Outcome, SkillSession};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{describe_skill_node, MouseButton, Vec2};
use crate::infrastructure::{InfraError, ServiceContainer};

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Describe { points, max_points }) => _describe(*points, *max_points),
        Some(Commands::Show) => _show(&open(cli, container)?),
        Some(Commands::Tooltip { leaf }) => _tooltip(&open(cli, container)?, leaf),
        Some(Commands::Upgrade { leaves, points }) => {
            _step(&mut open(cli, container)?, leaves, *points, Direction::Up)
        }
        Some(Commands::Downgrade { leaves, points }) => {
            _step(&mut open(cli, container)?, leaves, *points, Direction::Down)
        }
        Some(Commands::Click { x, y, right }) => {
            let button = if *right {
                MouseButton::Right
            } else {
                MouseButton::Left
            };
            _click(&mut open(cli, container)?, Vec2::new(*x, *y), button)
        }
        Some(Commands::Route { from, to }) => _route(&open(cli, container)?, from, to),
        Some(Commands::Config { command }) => _config(command, container),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

fn open(cli: &Cli, container: &ServiceContainer) -> CliResult<SkillSession> {
    Ok(container.loader().open(cli.file.as_deref())?)
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}

fn _describe(points: i64, max_points: i64) -> CliResult<()> {
    output::raw(&describe_skill_node(points, max_points));
    Ok(())
}

fn _show(session: &SkillSession) -> CliResult<()> {
    output::info(&session.render_tree());
    Ok(())
}

fn _tooltip(session: &SkillSession, leaf: &str) -> CliResult<()> {
    match session.tooltip(leaf)? {
        Some(text) => output::raw(&text),
        None => output::warning(&format!("{} has no tooltip binding", leaf)),
    }
    Ok(())
}

#[instrument(skip(session))]
fn _step(
    session: &mut SkillSession,
    leaves: &[String],
    points: i32,
    direction: Direction,
) -> CliResult<()> {
    if points < 1 {
        return Err(CliError::InvalidArgs(format!(
            "points must be positive: {}",
            points
        )));
    }
    for leaf in leaves {
        let outcome = match direction {
            Direction::Up => session.upgrade(leaf, points)?,
            Direction::Down => session.downgrade(leaf, points)?,
        };
        report(&outcome);
    }
    output::header("Result");
    output::info(&session.render_tree());
    Ok(())
}

#[instrument(skip(session))]
fn _click(session: &mut SkillSession, point: Vec2, button: MouseButton) -> CliResult<()> {
    match session.click(point, button) {
        Some(outcome) => {
            report(&outcome);
            if let Some(text) = session.hover(point)? {
                output::header("Tooltip");
                output::raw(&text);
            }
        }
        None => output::warning(&format!("nothing at ({}, {})", point.x, point.y)),
    }
    Ok(())
}

fn _route(session: &SkillSession, from: &str, to: &str) -> CliResult<()> {
    match session.route(from, to)? {
        Some(path) => output::info(&path.iter().join(" -> ")),
        None => output::warning(&format!("{} does not lead to {}", from, to)),
    }
    Ok(())
}

fn report(outcome: &Outcome) {
    if outcome.is_noop() {
        output::warning(&format!("{}: unchanged", outcome.leaf));
        return;
    }
    output::action(&outcome.leaf, &format!("{:+} points", outcome.applied));
    if outcome.discarded != 0 {
        output::failure(&format!(
            "{} points discarded by locked dependents",
            -outcome.discarded
        ));
    }
}

fn _config(command: &ConfigCommands, container: &ServiceContainer) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", &"(no config directory)"),
            }
            output::action("local", &local_config_path(&current_dir()?).display());
            Ok(())
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(&current_dir()?)
            };
            debug!("config init: {}", path.display());
            if container.fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force)",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .and_then(|_| container.fs.write(&path, &Settings::template()))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}

fn current_dir() -> CliResult<PathBuf> {
    std::env::current_dir()
        .map_err(|e| InfraError::io("resolve working directory", e).into())
}
