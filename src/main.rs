// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tenant_dashboard::models::NewUser;
use tenant_dashboard::render::{
    render_dashboard, render_history, render_login_panel, render_query_panel, render_session,
    render_upload_panel,
};
use tenant_dashboard::utils::logging::{format_info, format_success, format_warning};
use tenant_dashboard::{
    ApiAction, ApiClient, Config, Dashboard, FileStorage, LoadingSpinner, Outcome, Rejection,
    ShellCommand, ShellEvent, ShellSession, Validator, ViewSettings,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

type View = Dashboard<ApiClient, FileStorage>;
type Shell = ShellSession<ApiClient, FileStorage>;

#[derive(Parser)]
#[command(name = "tenant-dashboard")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Ask questions about your tenant's documents", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    /// Backend base URL
    #[arg(long, env = "API_BASE_URL")]
    base_url: Option<String>,

    /// Where the session is persisted between runs
    #[arg(long, value_name = "FILE")]
    session_file: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        tenant: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "TENANT_DASHBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Upload a document for ingestion
    Upload { file: PathBuf },

    /// Ask a question about the uploaded documents
    Ask {
        question: String,

        #[arg(short = 'k', long, value_name = "NUM")]
        top_k: Option<u32>,
    },

    /// Check that the backend is reachable
    Health,

    /// Manage tenants
    Tenants {
        #[command(subcommand)]
        command: TenantCommands,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Interactive dashboard that keeps question history while it runs
    Shell,
}

#[derive(Subcommand)]
enum TenantCommands {
    List,
    Create { name: String },
}

#[derive(Subcommand)]
enum UserCommands {
    Create {
        #[arg(short, long)]
        tenant: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "TENANT_DASHBOARD_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        role: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.color {
        colored::control::set_override(false);
    }
    tenant_dashboard::utils::logging::init_logger(cli.color, cli.verbose);

    let mut config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(session_file) = cli.session_file {
        config.session.storage_path = Some(session_file);
    }
    config.validate().context("Invalid configuration")?;

    info!("Using backend at {}", config.api.base_url);

    match cli.command {
        Commands::Login {
            tenant,
            email,
            password,
        } => cmd_login(&config, cli.color, &tenant, &email, &password).await?,
        Commands::Logout => cmd_logout(&config)?,
        Commands::Whoami => cmd_whoami(&config)?,
        Commands::Upload { file } => cmd_upload(&config, cli.color, file).await?,
        Commands::Ask { question, top_k } => {
            if let Some(top_k) = top_k {
                config.api.top_k = top_k;
            }
            config.validate().context("Invalid configuration")?;
            cmd_ask(&config, cli.color, &question).await?
        }
        Commands::Health => cmd_health(&config).await?,
        Commands::Tenants { command } => cmd_tenants(&config, command).await?,
        Commands::Users { command } => cmd_users(&config, command).await?,
        Commands::Shell => cmd_shell(&config).await?,
    }

    Ok(())
}

fn open_dashboard(config: &Config) -> Result<View> {
    let api = ApiClient::new(&config.api).context("Failed to create API client")?;
    let path = config.session.resolve_path();
    let storage = FileStorage::open(&path)
        .with_context(|| format!("Failed to open session file {}", path.display()))?;
    Ok(Dashboard::new(api, storage, ViewSettings::from(config)))
}

async fn cmd_login(
    config: &Config,
    colored: bool,
    tenant: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let mut view = open_dashboard(config)?;

    let spinner = LoadingSpinner::start("Logging in...", colored);
    let submitted = view.login(tenant, email, password).await;
    spinner.finish();
    submitted.map_err(|rejection| anyhow!(rejection))?;

    if let Some(message) = view.auth().error() {
        return Err(anyhow!(message.to_string()));
    }

    println!("{}", render_login_panel(view.auth()));
    Ok(())
}

fn cmd_logout(config: &Config) -> Result<()> {
    let mut view = open_dashboard(config)?;
    view.logout();
    println!("{}", format_success("Logged out."));
    Ok(())
}

fn cmd_whoami(config: &Config) -> Result<()> {
    let view = open_dashboard(config)?;
    println!("{}", render_session(view.session()));
    Ok(())
}

async fn cmd_upload(config: &Config, colored: bool, file: PathBuf) -> Result<()> {
    let mut view = open_dashboard(config)?;
    view.choose_file(file).map_err(|rejection| anyhow!(rejection))?;

    let spinner = LoadingSpinner::start("Uploading...", colored);
    let submitted = view.upload().await;
    spinner.finish();
    submitted.map_err(|rejection| anyhow!(rejection))?;

    if let Some(message) = view.upload_state().error() {
        return Err(anyhow!(message.to_string()));
    }

    println!(
        "{}",
        render_upload_panel(view.selected_file(), view.upload_state())
    );
    Ok(())
}

async fn cmd_ask(config: &Config, colored: bool, question: &str) -> Result<()> {
    let mut view = open_dashboard(config)?;

    let spinner = LoadingSpinner::start("Asking...", colored);
    let submitted = view.ask(question).await;
    spinner.finish();
    submitted.map_err(|rejection| anyhow!(rejection))?;

    if let Some(message) = view.query_state().error() {
        return Err(anyhow!(message.to_string()));
    }

    println!(
        "{}",
        render_query_panel(view.query_state(), config.ui.source_preview_chars)
    );
    Ok(())
}

async fn cmd_health(config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.api).context("Failed to create API client")?;
    let report = client.health().await;
    print!("{}", report.format());

    if !report.is_healthy() {
        return Err(anyhow!("Backend at {} is not healthy", report.base_url));
    }
    Ok(())
}

async fn cmd_tenants(config: &Config, command: TenantCommands) -> Result<()> {
    let client = ApiClient::new(&config.api).context("Failed to create API client")?;

    match command {
        TenantCommands::List => {
            let tenants = client.list_tenants().await?;
            if tenants.is_empty() {
                println!("{}", format_info("No tenants yet."));
            }
            for tenant in tenants {
                println!("{}  {}", tenant.id, tenant.name);
            }
        }
        TenantCommands::Create { name } => {
            let tenant = client.create_tenant(&name).await?;
            println!(
                "{}",
                format_success(&format!("Created tenant {} ({})", tenant.name, tenant.id))
            );
        }
    }

    Ok(())
}

async fn cmd_users(config: &Config, command: UserCommands) -> Result<()> {
    let client = ApiClient::new(&config.api).context("Failed to create API client")?;

    match command {
        UserCommands::Create {
            tenant,
            email,
            password,
            role,
        } => {
            let tenant_id = Validator::validate_tenant_id(&tenant)?;
            Validator::validate_email(&email)?;

            let user = NewUser::new(&tenant_id.to_string(), &email, &password, role.as_deref());
            let created = client.create_user(&user).await?;
            println!(
                "{}",
                format_success(&format!(
                    "Created {} user {} ({})",
                    created.role, created.email, created.id
                ))
            );
        }
    }

    Ok(())
}

async fn cmd_shell(config: &Config) -> Result<()> {
    let mut shell = ShellSession::new(open_dashboard(config)?);

    println!("{}\n", render_dashboard(shell.view()));
    println!("{}", format_info("Type 'help' for a list of commands."));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                let command = match ShellCommand::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", format_warning(&e.to_string()));
                        prompt()?;
                        continue;
                    }
                };

                let event = shell.submit(command);
                if show_event(&shell, event) {
                    break;
                }
            }
            Some((action, outcome)) = shell.next_completion(), if shell.has_in_flight() => {
                println!();
                show_completion(&shell, action, outcome);
            }
        }
        prompt()?;
    }

    while let Some((action, outcome)) = shell.next_completion().await {
        show_completion(&shell, action, outcome);
    }

    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

fn render_panel(view: &View, action: ApiAction) -> String {
    match action {
        ApiAction::Upload => render_upload_panel(view.selected_file(), view.upload_state()),
        ApiAction::Query => {
            render_query_panel(view.query_state(), view.settings().source_preview_chars)
        }
        _ => render_dashboard(view),
    }
}

/// Prints the result of a submitted command. Returns true on quit.
fn show_event(shell: &Shell, event: ShellEvent) -> bool {
    let view = shell.view();
    match event {
        ShellEvent::Quit => return true,
        ShellEvent::Nothing => {}
        ShellEvent::ShowHelp => println!("{}", tenant_dashboard::shell::HELP),
        ShellEvent::ShowStatus => println!("{}", render_dashboard(view)),
        ShellEvent::ShowHistory => println!("{}", render_history(view.history())),
        ShellEvent::LoggedOut => println!("{}", render_login_panel(view.auth())),
        ShellEvent::FileSelected => println!("{}", render_panel(view, ApiAction::Upload)),
        ShellEvent::Started(action) => println!("{}", render_panel(view, action)),
        ShellEvent::Rejected(
            _,
            rejection @ (Rejection::AlreadyAuthenticated | Rejection::InFlight(_)),
        ) => println!("{}", format_warning(&rejection.to_string())),
        ShellEvent::Rejected(action, _) => println!("{}", render_panel(view, action)),
    }
    false
}

fn show_completion(shell: &Shell, action: ApiAction, outcome: Outcome) {
    match outcome {
        Outcome::Applied => println!("{}", render_panel(shell.view(), action)),
        Outcome::Discarded => println!(
            "{}",
            format_warning(&format!("Ignored a {} response for an earlier session.", action))
        ),
    }
}
