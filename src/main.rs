//! Notice board command-line client.
//!
//! One command per invocation; the session token comes from
//! `NOTICEBOARD_TOKEN` (print one with `noticeboard login`).

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use noticeboard::config::{normalize_api_url, Config, LogFormat};
use noticeboard::errors::ClientResult;
use noticeboard::models::{
    CreateNoticeRequest, Credentials, Notice, NoticeCategory, NoticeFilter, NoticeStatus,
    Notification, RegisterRequest, Role, UpdateNoticeRequest,
};
use noticeboard::moderation::ModerationOutcome;
use noticeboard::NoticeBoard;

#[derive(Debug, Parser)]
#[command(name = "noticeboard", version, about = "Community notice board client")]
struct Cli {
    /// Server URL, overrides NOTICEBOARD_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and print the token to export as NOTICEBOARD_TOKEN
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the current user
    Whoami,
    /// List notices
    Notices {
        /// Case-insensitive text to find in title or message
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<NoticeCategory>,
        #[arg(long)]
        status: Option<NoticeStatus>,
        /// Only the newest N notices
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List your own notices
    Mine,
    /// Show one notice
    Show { id: String },
    /// Submit a notice for review
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        #[arg(long, default_value = "general")]
        category: NoticeCategory,
    },
    /// Edit a notice's title, message or category
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        message: Option<String>,
        #[arg(long)]
        category: Option<NoticeCategory>,
    },
    /// Delete a notice
    DeleteNotice { id: String },
    /// List notices waiting for review (admin)
    Pending,
    /// Approve a pending notice (admin)
    Approve { id: String },
    /// Reject a pending notice (admin)
    Reject { id: String },
    /// List your notifications
    Notifications,
    /// Print the unread notification count
    Badge,
    /// Mark a notification read
    Read { id: String },
    /// Delete a notification
    Dismiss { id: String },
    /// List registered users (admin)
    Users,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.api_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);
    tracing::debug!("Using notice board at {}", config.api_url);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}: {}", e.error_code(), e);
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn load_config(api_url: Option<&str>) -> ClientResult<Config> {
    let mut config = Config::from_env()?;
    if let Some(url) = api_url {
        config.api_url = normalize_api_url(url)?;
    }
    Ok(config)
}

fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Logs go to stderr; stdout is command output.
    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(command: Command, config: &Config) -> ClientResult<()> {
    let board = NoticeBoard::new(config)?;

    match command {
        Command::Login {
            email,
            password,
            role,
        } => {
            let user = board
                .client
                .login(&Credentials::new(email, password, role))
                .await?;
            println!("Logged in as {} <{}> ({})", user.name, user.email, user.role);
            if let Some(token) = board.session.token().await {
                println!("export NOTICEBOARD_TOKEN={}", token);
            }
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let request = RegisterRequest {
                name,
                email,
                password,
            };
            board.client.register(&request).await?;
            println!("Account created for {}. Log in to continue.", request.email);
        }
        Command::Whoami => {
            let user = board.client.current_user().await?;
            println!("{} <{}> ({})", user.name, user.email, user.role);
        }
        Command::Notices {
            search,
            category,
            status,
            limit,
        } => {
            let notices = board.client.list_notices(limit).await?;
            let filter = NoticeFilter {
                search,
                category,
                status,
            };
            let shown = filter.apply(&notices);
            if shown.is_empty() {
                println!("No notices found.");
            }
            for notice in shown {
                print_notice_line(notice);
            }
        }
        Command::Mine => {
            let notices = board.client.my_notices().await?;
            if notices.is_empty() {
                println!("You have not posted any notices yet.");
            }
            for notice in &notices {
                print_notice_line(notice);
            }
        }
        Command::Show { id } => {
            let notice = board.client.get_notice(&id).await?;
            print_notice_detail(&notice);
        }
        Command::Post {
            title,
            message,
            category,
        } => {
            let request = CreateNoticeRequest::new(title, message).with_category(category);
            let notice = board.client.create_notice(&request).await?;
            println!("Submitted notice {} ({}).", notice.id, notice.status);
        }
        Command::Edit {
            id,
            title,
            message,
            category,
        } => {
            let request = UpdateNoticeRequest {
                title,
                message,
                category,
            };
            board.client.update_notice(&id, &request).await?;
            println!("Updated notice {}.", id);
        }
        Command::DeleteNotice { id } => {
            board.client.delete_notice(&id).await?;
            println!("Deleted notice {}.", id);
        }
        Command::Pending => {
            board.client.current_user().await?;
            let pending = board.moderation.refresh_pending().await?;
            if pending.is_empty() {
                println!("No pending notices for approval.");
            }
            for notice in &pending {
                print_notice_line(notice);
            }
        }
        Command::Approve { id } => {
            prepare_moderation(&board).await?;
            let outcome = board.moderation.approve(&id).await?;
            print_outcome(&board, &outcome).await;
        }
        Command::Reject { id } => {
            prepare_moderation(&board).await?;
            let outcome = board.moderation.reject(&id).await?;
            print_outcome(&board, &outcome).await;
        }
        Command::Notifications => {
            let unread = board.notifications.load().await?;
            let notifications = board.state().notifications().await;
            if notifications.is_empty() {
                println!("No notifications yet.");
            }
            for notification in &notifications {
                print_notification_line(notification);
            }
            println!("{} unread", unread);
        }
        Command::Badge => {
            let unread = board.notifications.refresh_unread_only().await?;
            println!("{}", unread);
        }
        Command::Read { id } => {
            board.notifications.load().await?;
            let unread = board.notifications.mark_read(&id).await?;
            println!("Marked {} as read. {} unread.", id, unread);
        }
        Command::Dismiss { id } => {
            board.notifications.load().await?;
            let unread = board.notifications.remove(&id).await?;
            println!("Deleted notification {}. {} unread.", id, unread);
        }
        Command::Users => {
            let users = board.client.list_users().await?;
            for user in &users {
                println!("{:<26} {:<24} {:<32} {}", user.id, user.name, user.email, user.role);
            }
        }
    }

    Ok(())
}

/// Fetch the profile for the admin check and fill both caches.
async fn prepare_moderation(board: &NoticeBoard) -> ClientResult<()> {
    board.client.current_user().await?;
    board.notifications.load().await?;
    board.moderation.refresh_pending().await?;
    Ok(())
}

async fn print_outcome(board: &NoticeBoard, outcome: &ModerationOutcome) {
    println!("Notice {} is now {}.", outcome.notice_id, outcome.status);
    if outcome.reconciled {
        println!("Notifications were reloaded from the server.");
    }
    if !outcome.pending_refreshed {
        println!("Could not refresh the pending list; it may be stale.");
    }
    println!(
        "{} pending, {} unread",
        board.moderation.pending().await.len(),
        board.state().unread_count().await
    );
}

fn print_notice_line(notice: &Notice) {
    println!(
        "{:<26} {:<9} {:<8} {}{}",
        notice.id,
        notice.status,
        notice.category,
        if notice.pinned { "[pinned] " } else { "" },
        notice.title
    );
}

fn print_notice_detail(notice: &Notice) {
    println!("{}", notice.title);
    println!("{}", notice.message);
    println!();
    println!("Category: {}", notice.category);
    println!("Status:   {}", notice.status);
    println!("Posted:   {}", notice.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(owner) = &notice.user {
        println!(
            "By:       {}",
            owner.name.as_deref().unwrap_or(owner.id.as_str())
        );
    }
    if notice.pinned {
        println!("Pinned");
    }
}

fn print_notification_line(notification: &Notification) {
    println!(
        "{:<26} {} {}  {}",
        notification.id,
        if notification.read { " " } else { "*" },
        notification.created_at.format("%Y-%m-%d %H:%M"),
        notification.message
    );
}
