// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use datadesk_core::{AppState, Environment, Role};
use datadesk_db::Store;
use runtime::DeskRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `datadesk --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let mut store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or DATADESK_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if options.demo {
        for environment in Environment::ALL {
            store.seed_demo_data(environment)?;
        }
    }

    let client = if config.api_enabled() {
        Some(
            datadesk_api::Client::new(
                config.api_base_url(),
                config.api_token(),
                config.api_timeout()?,
            )
            .with_context(|| {
                format!(
                    "invalid [api] config in {}; fix base_url/token/timeout values",
                    options.config_path.display()
                )
            })?,
        )
    } else {
        None
    };
    if options.check_only {
        return Ok(());
    }

    let mut state = AppState::default();
    state.active_domain = config.start_domain();

    if let Some(saved) = store.get_setting(runtime::ENVIRONMENT_SETTING)?
        && let Some(environment) = Environment::parse(&saved)
    {
        state.environment = environment;
    }

    match &client {
        Some(client) => {
            let user = client.current_user().with_context(|| {
                format!(
                    "authenticate with the backend; check [api].token in {}",
                    options.config_path.display()
                )
            })?;
            state.role = user.role;
            state.status_line = Some(format!("signed in as {}", user.email));
        }
        // Without a backend there is nobody to gate; local data is all
        // the user's own.
        None => state.role = Role::Admin,
    }

    if state.environment == Environment::Production && !state.role.can_access_production() {
        state.environment = Environment::Staging;
    }

    let export_dir = env::current_dir().context("resolve working directory for exports")?;
    let mut runtime = DeskRuntime::new(&mut store, client, export_dir);
    datadesk_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("datadesk");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with seeded demo data (in-memory)");
    println!("  --check                  Validate config + DB + API settings");
    println!("  --help                   Show this help");
}
