use anyhow::Result;

mod args;
mod report;
mod run;

pub use args::{Arguments, Command};

pub fn run_cli(args: Arguments) -> Result<i32> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(0);
    };

    run::run(args)
}
