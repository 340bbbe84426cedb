mod cli;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cli::{Cli, Command};
use tdl::config::Config;
use tdl::request::{Request, UreqTransport};
use tdl::tui::app::{App, Theme, ToastKind};
use tdl::{logging, output, paths, tui};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(Path::new(path))?,
        None => Config::load()?,
    };
    logging::init(Path::new(&paths::log_path()))?;

    let server = cli.server.as_deref().unwrap_or(config.server_url());
    let transport = UreqTransport::new(server, config.timeout());
    log::info!("using server {}", transport.base_url());
    let mut request = Request::new(transport);

    let theme = if config.dark() { Theme::Dark } else { Theme::Light };
    let mut app = App::new(config.lang(), theme, config.toast_duration());

    match cli.command {
        None | Some(Command::Tui) => tui::run(&mut app, &mut request)?,

        Some(Command::Lists { json }) => {
            connect(&mut app, &mut request, &cli.login, &cli.password)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::list_summaries(&app.manager))?
                );
            } else {
                print!("{}", output::format_list_summaries(&app.manager));
            }
        }

        Some(Command::Show { list, json }) => {
            connect(&mut app, &mut request, &cli.login, &cli.password)?;
            let list = app
                .manager
                .find_by_name(&list)
                .with_context(|| format!("task list '{list}' not found"))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::task_records(list))?
                );
            } else {
                print!("{}", output::format_task_list(list));
            }
        }
    }

    Ok(())
}

/// Load configuration and lists without the interactive UI, signing in with
/// the given credentials if the server session is not authenticated.
fn connect(
    app: &mut App,
    request: &mut Request<UreqTransport>,
    login: &Option<String>,
    password: &Option<String>,
) -> Result<()> {
    request
        .get_config(app)
        .context("failed to fetch server config")?;
    if app.login_visible() {
        if let Some(form) = app.login_form_mut() {
            form.login = login.clone().unwrap_or_default();
            form.password = password.clone().unwrap_or_default();
        }
        request.auth(app);
    }
    let signed_in = !app.login_visible();

    for toast in app.notifications.drain() {
        let prefix = match toast.kind {
            ToastKind::Error => "error: ",
            ToastKind::Info | ToastKind::Success => "",
        };
        eprintln!("{prefix}{}", toast.message);
    }
    if !signed_in {
        bail!("not signed in; pass --login and --password");
    }
    Ok(())
}
