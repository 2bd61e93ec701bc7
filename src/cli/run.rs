//! Command dispatch.
//!
//! Loads configuration, applies CLI overrides, and hands each command to
//! the engine. Returns the process exit code.

use std::{fs, path::Path};

use anyhow::{Result, bail};

use super::args::{Arguments, CheckCommand, Command, CommonArgs, RenameCommand, UsageCommand};
use super::report;
use crate::config::{CONFIG_FILE_NAME, Config, default_config_json, load_config};
use crate::core::engine::Engine;
use crate::utils::looks_like_key;

pub fn run(Arguments { command }: Arguments) -> Result<i32> {
    match command {
        Some(Command::Check(cmd)) => check(cmd),
        Some(Command::Usage(cmd)) => usage(cmd),
        Some(Command::Rename(cmd)) => rename(cmd),
        Some(Command::Init) => init(),
        None => {
            bail!("No command provided. Use --help to see available commands.")
        }
    }
}

fn load_with_overrides(common: &CommonArgs) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let mut config = load_config(&cwd)?.config;

    if let Some(root) = &common.source_root {
        config.source_root = root.to_string_lossy().into_owned();
    }
    if let Some(dir) = &common.translations_root {
        config.translations_root = dir.to_string_lossy().into_owned();
    }
    if let Some(mode) = common.mode {
        config.extraction_mode = mode;
    }

    config.validate()?;
    Ok(config)
}

fn check(cmd: CheckCommand) -> Result<i32> {
    let mut config = load_with_overrides(&cmd.common)?;
    if cmd.strict {
        config.strict_placeholders = true;
    }

    let mut engine = Engine::new(config, cmd.common.verbose);
    let result = engine.run_check()?;

    if cmd.common.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        report::print_check(&result);
    }

    Ok(if result.summary.ok { 0 } else { 1 })
}

fn usage(cmd: UsageCommand) -> Result<i32> {
    let config = load_with_overrides(&cmd.common)?;
    let mut engine = Engine::new(config, cmd.common.verbose);

    if cmd.pages {
        let map = engine.build_key_usage_map()?;
        if cmd.common.json {
            println!("{}", serde_json::to_string_pretty(&map)?);
        } else {
            report::print_pages(&map);
        }
    } else {
        let usage = engine.scan_usage()?;
        if cmd.common.json {
            println!("{}", serde_json::to_string_pretty(&usage)?);
        } else {
            report::print_usage(&usage);
        }
    }

    Ok(0)
}

fn rename(cmd: RenameCommand) -> Result<i32> {
    if !looks_like_key(&cmd.new) {
        bail!("\"{}\" is not a valid key name", cmd.new);
    }
    if cmd.old == cmd.new {
        bail!("Old and new key are identical.");
    }

    let config = load_with_overrides(&cmd.common)?;
    let mut engine = Engine::new(config, cmd.common.verbose);

    let outcome = engine.rename_key_usage(&cmd.old, &cmd.new)?;
    let moved_locales = if cmd.code_only {
        0
    } else {
        engine.rename_translation_key(&cmd.old, &cmd.new)?
    };

    if cmd.common.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        report::print_rename(&cmd.old, &cmd.new, &outcome, moved_locales);
    }

    Ok(0)
}

fn init() -> Result<i32> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(config_path, default_config_json()?)?;
    report::print_init();
    Ok(0)
}
