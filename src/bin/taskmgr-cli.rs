use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use taskmgr::client::{ApiClient, FileTokenStorage, Session, TaskView, TokenStorage};
use taskmgr::models::Credentials;

#[derive(Parser)]
#[command(name = "taskmgr-cli", about = "Command-line client for the taskmgr server")]
struct Cli {
    /// Base URL of the server.
    #[arg(long, env = "TASKMGR_SERVER", default_value = "http://127.0.0.1:5001")]
    server: String,

    /// File holding the session token. Defaults to the user's config directory.
    #[arg(long, env = "TASKMGR_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account
    Register { username: String, password: String },
    /// Log in and remember the token
    Login { username: String, password: String },
    /// Forget the stored token
    Logout,
    /// Show your tasks
    List,
    /// Add a task
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change a task's title and/or description
    Edit {
        id: i32,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Mark a task complete
    Done { id: i32 },
    /// Mark a task incomplete
    Undone { id: i32 },
    /// Delete a task
    Rm { id: i32 },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));
    let cli = Cli::parse();

    let storage = match cli
        .token_file
        .clone()
        .map(FileTokenStorage::new)
        .or_else(FileTokenStorage::default_location)
    {
        Some(storage) => storage,
        None => {
            eprintln!("no config directory available; pass --token-file");
            return ExitCode::FAILURE;
        }
    };

    match run(cli, storage).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, storage: FileTokenStorage) -> Result<(), String> {
    let api = ApiClient::new(cli.server);
    let mut session = Session::load(storage).map_err(|e| e.to_string())?;

    match cli.command {
        Command::Register { username, password } => {
            let user = api
                .register(&Credentials::new(username, password))
                .await
                .map_err(|e| e.user_message("Registration failed"))?;
            println!("registered {} (id {})", user.username, user.id);
            return Ok(());
        }
        Command::Login { username, password } => {
            let token = api
                .login(&Credentials::new(username, password))
                .await
                .map_err(|e| e.user_message("Login failed"))?;
            session.login(token).map_err(|e| e.to_string())?;
            println!("logged in");
            return Ok(());
        }
        Command::Logout => {
            session.logout().map_err(|e| e.to_string())?;
            println!("logged out");
            return Ok(());
        }
        _ => {}
    }

    if !session.is_authenticated() {
        return Err("not logged in; run `taskmgr-cli login <username> <password>`".into());
    }

    let mut view = TaskView::new();
    view.mount(&api, &mut session).await;
    if view.error.is_none() {
        apply(&mut view, &api, &mut session, cli.command).await;
    }

    if view.needs_login {
        return Err(format!(
            "{}; session cleared, run `taskmgr-cli login` again",
            view.error.unwrap_or_default()
        ));
    }
    if let Some(error) = view.error.take() {
        return Err(error);
    }
    print!("{}", view.render());
    Ok(())
}

async fn apply<S: TokenStorage>(
    view: &mut TaskView,
    api: &ApiClient,
    session: &mut Session<S>,
    command: Command,
) {
    match command {
        Command::Add { title, description } => {
            view.new_title = title;
            view.new_description = description.unwrap_or_default();
            view.create(api, session).await;
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            if !view.start_editing(id) {
                view.error = Some("Task not found".into());
                return;
            }
            if let Some(edit) = view.editing.as_mut() {
                if let Some(title) = title {
                    edit.title = title;
                }
                if let Some(description) = description {
                    edit.description = description;
                }
            }
            view.save_edit(api, session).await;
        }
        Command::Done { id } => set_complete(view, api, session, id, true).await,
        Command::Undone { id } => set_complete(view, api, session, id, false).await,
        Command::Rm { id } => view.delete(api, session, id).await,
        Command::List | Command::Register { .. } | Command::Login { .. } | Command::Logout => {}
    }
}

async fn set_complete<S: TokenStorage>(
    view: &mut TaskView,
    api: &ApiClient,
    session: &mut Session<S>,
    id: i32,
    complete: bool,
) {
    match view.find(id).map(|task| task.is_complete) {
        Some(current) if current == complete => {}
        Some(_) => view.toggle_completion(api, session, id).await,
        None => view.error = Some("Task not found".into()),
    }
}
