//! Command-line access to the local session and route policy.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use printshop_auth::{Role, User};
use printshop_client::{ClientConfig, GuardState, HistoryNavigator, use_route_guard, DENIAL_REDIRECT_DELAY};

#[derive(Debug, Parser)]
#[command(name = "printshop-client", about = "Inspect and drive the PrintShop client session")]
struct Cli {
    /// Session file (overrides PRINTSHOP_SESSION_FILE).
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// JSON route policy (overrides PRINTSHOP_ROUTE_POLICY).
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store a login response (token + user JSON) as the current session.
    Login {
        #[arg(long)]
        token: String,
        /// User record as returned by the backend.
        #[arg(long)]
        user: String,
    },
    /// Show the signed-in user.
    Whoami,
    /// Run the route guard for a path, as a layout would on navigation.
    Check {
        path: String,
        /// Do not wait for the denial countdown.
        #[arg(long)]
        no_wait: bool,
    },
    /// Clear the session.
    Logout,
    /// Print the route policy.
    Policy {
        /// Only this role's rule.
        #[arg(long, conflicts_with = "route")]
        role: Option<Role>,
        /// Roles allowed to open this route.
        #[arg(long)]
        route: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    printshop_observability::init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    if let Some(path) = cli.policy {
        config.policy_file = Some(path);
    }

    let navigator = Arc::new(HistoryNavigator::new());
    let ctx = config.build_context(navigator.clone())?;

    match cli.command {
        Command::Login { token, user } => {
            ctx.store()
                .login_raw(&token, &user)
                .with_context(|| format!("failed to write session to {}", config.session_file.display()))?;
            match ctx.store().current_user() {
                Some(user) => println!("signed in as {} ({})", user.display_name(), user.role),
                None => println!("stored, but the user record is not readable; the session counts as signed out"),
            }
        }
        Command::Whoami => match ctx.store().current_user() {
            Some(user) if ctx.store().is_authenticated() => print_user(&user)?,
            _ => println!("not signed in"),
        },
        Command::Check { path, no_wait } => {
            let mut hook = use_route_guard(&ctx);
            let handle = hook.on_route_change(&path);

            match hook.state() {
                GuardState::Permitted { .. } => {
                    let who = handle
                        .user
                        .as_ref()
                        .map(|u| u.role.to_string())
                        .unwrap_or_else(|| "anonymous".to_string());
                    println!("permitted: {path} ({who})");
                }
                GuardState::SignedOut => println!("signed out: redirected to /login"),
                GuardState::Denied { user, .. } => {
                    let decision = ctx.policy().explain(Some(user.role), &path);
                    if let Some(notice) = hook.notice() {
                        println!("{}: {}", notice.title, notice.message);
                    }
                    println!("reason: {}", decision.reason);
                    if !no_wait {
                        tokio::time::sleep(DENIAL_REDIRECT_DELAY + Duration::from_millis(50)).await;
                    }
                }
                GuardState::Checking => {}
            }

            for (to, kind) in navigator.visits() {
                println!("navigated ({kind:?}) -> {to}");
            }
        }
        Command::Logout => {
            ctx.logout();
            println!("signed out");
        }
        Command::Policy { role, route } => {
            if let Some(route) = route {
                let roles = ctx.policy().roles_allowing(&route);
                let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
                println!("{route}: {}", if names.is_empty() { "<no role>".to_string() } else { names.join(", ") });
            } else {
                for (r, rule) in ctx.policy().iter() {
                    if role.is_some_and(|wanted| wanted != r) {
                        continue;
                    }
                    println!("{r} (lands on {})", rule.default_route);
                    for allowed in &rule.allowed_routes {
                        println!("  {allowed}");
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_user(user: &User) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(user).context("failed to render user")?);
    Ok(())
}
