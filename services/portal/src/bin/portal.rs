//! services/portal/src/bin/portal.rs
//!
//! Command-line front end for the classroom portal. Each invocation restores the
//! saved session, runs one command through the same views a GUI would use, and
//! exits.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use classroom_core::domain::{Assignment, AssignmentStatus, Role, Submission};
use classroom_core::guard::{home_view, View};
use portal_lib::{app::AppContext, config::Config, error::ClientError, views::ActionError};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Classroom portal client.
#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Assignments and submissions from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session.
    Login { email: String, password: String },

    /// Forget the saved session.
    Logout,

    /// Show who is logged in.
    Whoami,

    /// Navigate to a route (e.g. `/teacher`) and report where the guard lands.
    Open { path: String },

    /// List assignments.
    Assignments {
        /// Only show assignments in this status (teachers only)
        #[arg(long)]
        status: Option<AssignmentStatus>,
    },

    /// Create a draft assignment.
    #[command(name = "create-assignment")]
    CreateAssignment {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// RFC 3339 timestamp or YYYY-MM-DD
        #[arg(long, value_parser = parse_due_date)]
        due: Option<DateTime<Utc>>,
    },

    /// Set an assignment's status.
    #[command(name = "set-status")]
    SetStatus { id: String, status: AssignmentStatus },

    /// Publish a draft, or complete a published assignment.
    Advance { id: String },

    /// Show your own submission for an assignment.
    #[command(name = "my-submission")]
    MySubmission { assignment_id: String },

    /// Submit an answer.
    Submit { assignment_id: String, answer: String },

    /// List every submission for an assignment.
    Submissions { assignment_id: String },
}

fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{}' is neither RFC 3339 nor YYYY-MM-DD", raw))
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- 2. Restore the Session & Start the Coordinator ---
    let ctx = AppContext::from_config(config)?;
    info!("Client ready");

    // --- 3. Run the Command ---
    let outcome = run(&ctx, cli.command).await;

    // Lets a 401 raised by the command clear the saved session before exiting.
    // Views stay silent on a 401, so the command may have looked successful.
    let session_ended = ctx.shutdown().await;
    match outcome {
        Ok(()) if session_ended => {
            eprintln!("{}", ActionError::Unauthenticated);
            Err(ActionError::Unauthenticated.into())
        }
        other => other,
    }
}

async fn run(ctx: &AppContext, command: Commands) -> Result<(), ClientError> {
    match command {
        Commands::Login { email, password } => {
            let (session, landed) = ctx.login(&email, &password).await?;
            println!("Logged in as {} ({})", session.display_name, session.role);
            println!("Now at {}", landed);
        }
        Commands::Logout => {
            ctx.logout();
            println!("Logged out");
        }
        Commands::Whoami => match ctx.session.get() {
            Some(session) => println!("{} ({})", session.display_name, session.role),
            None => println!("Not logged in"),
        },
        Commands::Open { path } => {
            let requested = View::from_path(&path)
                .ok_or_else(|| ClientError::Internal(format!("unknown route '{}'", path)))?;
            println!("{}", ctx.navigator.navigate(requested));
        }
        Commands::Assignments { status } => {
            let role = ctx.session.get().map(|s| s.role).unwrap_or(Role::Other);
            let home = home_view(role);
            enter(ctx, home.clone())?;
            if home == View::TeacherDashboard {
                let view = ctx.teacher_dashboard();
                view.set_filter(status).await;
                report(view.error())?;
                print_assignments(&view.assignments());
            } else {
                if status.is_some() {
                    eprintln!("--status is ignored for students");
                }
                let view = ctx.student_dashboard();
                view.load().await;
                report(view.error())?;
                print_assignments(&view.assignments());
            }
        }
        Commands::CreateAssignment { title, description, due } => {
            enter(ctx, View::TeacherDashboard)?;
            let view = ctx.teacher_dashboard();
            view.open_create_form();
            view.set_title(title);
            view.set_description(description);
            view.set_due_date(due);
            view.create().await?;
            print_notice(view.notice());
            print_assignments(&view.assignments());
        }
        Commands::SetStatus { id, status } => {
            enter(ctx, View::TeacherDashboard)?;
            let view = ctx.teacher_dashboard();
            view.change_status(&id, status).await?;
            print_notice(view.notice());
            print_assignments(&view.assignments());
        }
        Commands::Advance { id } => {
            enter(ctx, View::TeacherDashboard)?;
            let view = ctx.teacher_dashboard();
            view.load().await;
            report(view.error())?;
            view.advance(&id).await?;
            print_notice(view.notice());
            print_assignments(&view.assignments());
        }
        Commands::MySubmission { assignment_id } => {
            enter(ctx, View::StudentDashboard)?;
            let view = ctx.student_dashboard();
            view.load().await;
            report(view.error())?;
            match view.open_submission(&assignment_id).await? {
                Some(submission) => print_submissions(&[submission]),
                None => println!("No submission yet"),
            }
        }
        Commands::Submit { assignment_id, answer } => {
            enter(ctx, View::StudentDashboard)?;
            let view = ctx.student_dashboard();
            view.load().await;
            report(view.error())?;
            view.open_submission(&assignment_id).await?;
            view.set_answer(answer);
            view.submit().await?;
            print_notice(view.notice());
        }
        Commands::Submissions { assignment_id } => {
            enter(ctx, View::TeacherSubmissions { assignment_id: assignment_id.clone() })?;
            let view = ctx.teacher_submissions(&assignment_id);
            view.load().await;
            report(view.error())?;
            println!("{}", view.heading());
            print_submissions(&view.submissions());
        }
    }
    Ok(())
}

/// Navigates to `view`, failing if the guard sends the client elsewhere.
fn enter(ctx: &AppContext, view: View) -> Result<(), ClientError> {
    if ctx.navigator.navigate(view.clone()) != view {
        return Err(ClientError::AccessDenied(view.path()));
    }
    Ok(())
}

/// Turns a view's inline error into the command's failure.
fn report(error: Option<String>) -> Result<(), ClientError> {
    match error {
        Some(message) => Err(ActionError::Failed(message).into()),
        None => Ok(()),
    }
}

fn print_notice(notice: Option<String>) {
    if let Some(message) = notice {
        println!("{}", message);
    }
}

fn print_assignments(assignments: &[Assignment]) {
    if assignments.is_empty() {
        println!("No assignments");
        return;
    }
    let now = Utc::now();
    for a in assignments {
        let due = match a.due_date {
            Some(due) if a.is_overdue(now) => format!("{} (overdue)", due.format("%Y-%m-%d")),
            Some(due) => due.format("%Y-%m-%d").to_string(),
            None => "No due date".to_string(),
        };
        println!("{:<26} {:<10} {:<12} {}", a.id, a.status, due, a.title);
    }
}

fn print_submissions(submissions: &[Submission]) {
    if submissions.is_empty() {
        println!("No submissions");
        return;
    }
    for s in submissions {
        let (name, email) = s
            .student
            .as_ref()
            .map(|st| (st.display_name(), st.email()))
            .unwrap_or(("Unknown Student", "N/A"));
        println!(
            "{:<26} {:<20} {:<24} {} {}",
            s.id,
            name,
            email,
            s.submitted_at.format("%Y-%m-%d %H:%M"),
            s.review_label()
        );
        println!("    {}", s.answer);
    }
}
