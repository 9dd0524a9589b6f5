use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use helm::auth::{AuthOutcome, LoginForm, SignupForm};
use helm::discussions::{DiscussionPane, SubmitOutcome};
use helm::feed::RowContent;
use helm::router::{Route, Tab};
use helm::{Config, HelmApp};

#[derive(Parser)]
#[command(name = "helm")]
#[command(about = "Tarot discussions and feed from the command line")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List discussions, optionally opening one
    Discussions {
        #[arg(long)]
        select: Option<i64>,
    },
    /// Start a new discussion
    NewDiscussion {
        #[arg(long)]
        name: String,
        #[arg(long)]
        text: String,
    },
    /// Ask a question in a discussion
    Ask {
        #[arg(long)]
        discussion: i64,
        #[arg(long)]
        text: String,
    },
    /// Scroll through the feed
    Feed {
        #[arg(long, default_value_t = 1)]
        pages: usize,
        #[arg(long)]
        viewport: Option<u32>,
    },
    /// Resolve a path through the router
    Open { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let json_logs = std::env::var("HELM_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helm=info".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    let mut config = Config::from_env();
    if let Command::Feed {
        viewport: Some(height),
        ..
    } = &args.command
    {
        config.feed.viewport_height = *height;
    }

    let mut app = HelmApp::new(config)?;

    match args.command {
        Command::Login { email, password } => {
            let outcome = app.login(LoginForm::new(email, password)).await;
            report_auth(outcome)?;
            println!("Logged in.");
        }
        Command::Signup {
            first_name,
            last_name,
            email,
            password,
        } => {
            let form = SignupForm {
                first_name,
                last_name,
                email,
                password,
            };
            report_auth(app.signup(form).await)?;
            for notification in app.notifications().drain() {
                println!("{}: {}", notification.title, notification.message);
            }
        }
        Command::Logout => {
            app.logout()?;
            println!("Logged out.");
        }
        Command::Whoami => {
            enter(&mut app, Tab::Discussions.path())?;
            let navbar = app.navbar().await;
            println!("{}", navbar.user_name);
        }
        Command::Discussions { select } => {
            enter(&mut app, Tab::Discussions.path())?;
            if let Some(id) = select {
                app.select_discussion(id);
            }

            let list = app.discussion_list().await?;
            match list.empty_text() {
                Some(text) => println!("{text}"),
                None => {
                    for entry in &list.entries {
                        let marker = if entry.selected { '>' } else { ' ' };
                        println!("{marker} {:>6}  {}", entry.id, entry.name);
                    }
                }
            }
            println!();
            print_pane(app.discussion_pane().await?);
        }
        Command::NewDiscussion { name, text } => {
            enter(&mut app, Tab::Discussions.path())?;
            report_submit(app.create_discussion(name, text).await)?;
            println!("Discussion created.");
        }
        Command::Ask { discussion, text } => {
            enter(&mut app, Tab::Discussions.path())?;
            app.select_discussion(discussion);
            report_submit(app.send_message(text).await)?;
            print_pane(app.discussion_pane().await?);
        }
        Command::Feed { pages, .. } => {
            enter(&mut app, Tab::Feed.path())?;
            let mut feed = app.feed();
            feed.load().await;
            for _ in 1..pages {
                if !feed.scroll_to(feed.total_size()).await {
                    break;
                }
            }
            if let Some(status) = feed.status_text() {
                println!("{status}");
            }
            for row in feed.visible_rows() {
                match row.content {
                    RowContent::Post(post) => {
                        println!("[{}] {}\n    {}", row.item.index, post.user_message, post.ai_message)
                    }
                    RowContent::Loader(text) => println!("{text}"),
                }
            }
            if let Some(footer) = feed.footer() {
                println!("{footer}");
            }
        }
        Command::Open { path } => {
            let route = app.navigate(&path)?;
            println!("{} -> {:?} ({})", app.location(), route, route.title());
        }
    }

    Ok(())
}

/// Navigate to a dashboard page, failing when the guard bounces us to login.
fn enter(app: &mut HelmApp, path: &str) -> anyhow::Result<()> {
    match app.navigate(path)? {
        Route::Login => anyhow::bail!("Not logged in. Run `helm login` first."),
        _ => Ok(()),
    }
}

fn report_auth(outcome: AuthOutcome) -> anyhow::Result<()> {
    match outcome {
        AuthOutcome::Navigate(_) => Ok(()),
        AuthOutcome::Invalid(errors) => anyhow::bail!("{errors}"),
        AuthOutcome::Failed(message) => anyhow::bail!("{message}"),
        AuthOutcome::Busy => anyhow::bail!("Another request is in progress"),
    }
}

fn report_submit(outcome: SubmitOutcome) -> anyhow::Result<()> {
    match outcome {
        SubmitOutcome::Done => Ok(()),
        SubmitOutcome::Invalid(errors) => anyhow::bail!("{errors}"),
        SubmitOutcome::Failed(message) => anyhow::bail!("{message}"),
        SubmitOutcome::Busy => anyhow::bail!("Another request is in progress"),
    }
}

fn print_pane(pane: DiscussionPane) {
    match pane {
        DiscussionPane::NoSelection { prompt } => println!("{prompt}"),
        DiscussionPane::Selected(view) => {
            let cards: Vec<_> = view
                .cards
                .iter()
                .map(|c| {
                    if c.is_missing() {
                        format!("{} (no image)", c.name)
                    } else {
                        format!("{} ({})", c.name, c.src)
                    }
                })
                .collect();
            if !cards.is_empty() {
                println!("Cards: {}", cards.join(", "));
            }
            for message in view.messages {
                let indent = match message.alignment {
                    helm::discussions::Alignment::Right => "                ",
                    helm::discussions::Alignment::Left => "",
                };
                println!("{indent}{}", message.text);
            }
        }
    }
}
