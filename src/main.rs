use clap::Parser;
use std::process;

use kanban::cli::commands::{Cli, Commands};
use kanban::cli;
use kanban::validation::SignUpForm;

fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;

    if let Err(e) = kanban::logging::init() {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output),
        Commands::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let form = SignUpForm {
                name,
                email,
                password,
                confirm_password,
            };
            cli::auth::signup(form, json_output)
        }
        Commands::Login { email, password } => cli::auth::login(&email, &password, json_output),
        Commands::Logout => cli::auth::logout(json_output),
        Commands::Whoami => cli::auth::whoami(json_output),
        Commands::Board => cli::board::run(json_output),
        Commands::Task(cmd) => cli::task::run(cmd, json_output),
        Commands::Column(cmd) => cli::column::run(cmd, json_output),
        Commands::Drag { active, over } => cli::drag::run(&active, over.as_deref(), json_output),
        Commands::Config(cmd) => cli::config::run(cmd, json_output),
    };

    process::exit(exit_code);
}
