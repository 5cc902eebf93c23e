//! TaskBase CLI - terminal client for the department dashboard.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

use taskbase_client::{Backend, ClientConfig, EmployeePatch, HttpBackend};
use taskbase_core::{
    Day, Difficulty, EmployeeDraft, EmployeeId, Period, ProjectId, StageId, TaskDraft, TaskFilter,
    TaskId,
};
use taskbase_state::{DepartmentPanel, EmployeePanel, ProjectBoard};

#[derive(Parser)]
#[command(name = "taskbase")]
#[command(about = "Department dashboard client", long_about = None)]
struct Cli {
    /// Backend base URL; defaults to $TASKBASE_API_URL
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Department summary for a period
    Department {
        /// Period start (defaults to the current month)
        #[arg(long)]
        from: Option<Day>,
        /// Period end
        #[arg(long)]
        to: Option<Day>,
        /// Leaderboard size
        #[arg(long, default_value = "3")]
        top: usize,
    },
    /// List the employee roster
    Employees,
    /// Show one employee with score and tasks for a period
    Employee {
        /// Employee ID
        id: i64,
        #[arg(long)]
        from: Option<Day>,
        #[arg(long)]
        to: Option<Day>,
    },
    /// Show one project with stages, tasks, and score
    Project {
        /// Project ID
        id: i64,
        #[arg(long)]
        from: Option<Day>,
        #[arg(long)]
        to: Option<Day>,
    },
    /// List tasks outside any project
    Tasks {
        #[arg(long)]
        from: Option<Day>,
        #[arg(long)]
        to: Option<Day>,
    },
    /// Search employees by name
    Search {
        /// Name substring
        query: String,
    },
    /// Add an employee
    AddEmployee {
        /// Full name
        name: String,
        /// Job position
        #[arg(long)]
        position: Option<String>,
        /// First day of employment (defaults to today)
        #[arg(long)]
        start: Option<Day>,
    },
    /// Put an employee back to active status
    RestoreEmployee {
        /// Employee ID
        id: i64,
    },
    /// Add a task
    AddTask {
        /// Task name
        name: String,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Difficulty weight: 1, 2, or 4
        #[arg(long, default_value = "2")]
        difficulty: i64,
        /// Due date
        #[arg(long)]
        deadline: Day,
        /// Executor employee IDs (repeatable)
        #[arg(long = "executor")]
        executors: Vec<i64>,
        /// Owning project ID
        #[arg(long)]
        project: Option<i64>,
        /// Owning stage ID
        #[arg(long)]
        stage: Option<i64>,
    },
    /// Mark a task done
    CompleteTask {
        /// Task ID
        id: i64,
        /// Completion date (defaults to today)
        #[arg(long)]
        on: Option<Day>,
    },
    /// Delete a task (requires $TASKBASE_DELETE_PASSWORD)
    DeleteTask {
        /// Task ID
        id: i64,
    },
    /// Close a project
    CloseProject {
        /// Project ID
        id: i64,
        /// Completion date (defaults to today)
        #[arg(long)]
        on: Option<Day>,
    },
    /// Delete a project (requires $TASKBASE_DELETE_PASSWORD)
    DeleteProject {
        /// Project ID
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    let base_url = cli
        .api_url
        .or_else(|| std::env::var("TASKBASE_API_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8080".to_string());
    let mut config = ClientConfig::new(base_url);
    if let Ok(password) = std::env::var("TASKBASE_DELETE_PASSWORD") {
        config = config.with_delete_password(password);
    }
    let backend = Arc::new(HttpBackend::new(config)?);
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Department { from, to, top } => {
            let period = period_or_month(from, to, today)?;
            let panel = DepartmentPanel::new(Arc::clone(&backend), period).with_top_limit(top);
            panel.load_name().await;
            panel.refresh().await;
            let state = panel.snapshot().await;

            if let Some(name) = state.name.value() {
                println!("{name}");
            }
            println!("Period {} .. {}", period.from, period.to);
            print_view("score", &state.score, |score| println!("  Score: {score}"));
            print_view("top employees", &state.top, |top| {
                for entry in top {
                    println!("  {:>4}  {}", entry.score, entry.name);
                }
            });
            print_view("projects", &state.projects, |projects| {
                for entry in projects {
                    println!(
                        "  #{} {} | {} | {}",
                        entry.project.id, entry.project.name, entry.project.status, entry.score,
                    );
                }
            });
        }
        Commands::Employees => {
            let employees = backend.employees().await?;
            println!("Employees ({})", employees.len());
            for employee in employees {
                println!(
                    "  #{} {} | {} | {}",
                    employee.id,
                    employee.name,
                    employee.position.as_deref().unwrap_or("-"),
                    employee.status,
                );
            }
        }
        Commands::Employee { id, from, to } => {
            let period = period_or_month(from, to, today)?;
            let panel = EmployeePanel::new(Arc::clone(&backend), period);
            panel.select(Some(EmployeeId(id))).await;
            let state = panel.snapshot().await;

            print_view("employee", &state.detail, |employee| {
                println!("Employee: {} (#{})", employee.name, employee.id);
                if let Some(position) = &employee.position {
                    println!("  Position: {position}");
                }
                println!("  Status: {}", employee.status);
            });
            print_view("score", &state.score, |score| {
                println!("  Score: {score} / expected {}", state.baseline);
            });
            print_view("tasks", &state.tasks, |tasks| {
                println!("  Tasks ({})", tasks.len());
                for task in tasks {
                    println!(
                        "    #{} {} | {} | weight {}",
                        task.id,
                        task.name,
                        task.status,
                        task.difficulty.weight(),
                    );
                }
            });
        }
        Commands::Project { id, from, to } => {
            let period = period_or_month(from, to, today)?;
            let board = ProjectBoard::new(Arc::clone(&backend), period);
            board.toggle_project(ProjectId(id)).await;
            let state = board.snapshot().await;

            print_view("score", &state.score, |score| {
                println!("Project #{id} | score {score}");
            });
            print_view("stages", &state.stages, |stages| {
                for stage in stages {
                    println!("  Stage: {}", stage.name);
                    if let Some(tasks) = state.stage_tasks.get(&stage.id).and_then(|v| v.value()) {
                        for task in tasks {
                            println!("    #{} {} | {}", task.id, task.name, task.status);
                        }
                    }
                }
            });
        }
        Commands::Tasks { from, to } => {
            let period = period_or_month(from, to, today)?;
            let tasks = backend
                .unassigned_tasks(&TaskFilter {
                    period: Some(period),
                    ..TaskFilter::default()
                })
                .await?;
            println!("Unassigned tasks ({})", tasks.len());
            for task in tasks {
                println!(
                    "  #{} {} | {} | due {}",
                    task.id,
                    task.name,
                    task.status,
                    task.deadline.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                );
            }
        }
        Commands::Search { query } => {
            let employees = backend.search_employees(&query).await?;
            for employee in employees {
                println!("  #{} {}", employee.id, employee.name);
            }
        }
        Commands::AddEmployee {
            name,
            position,
            start,
        } => {
            let draft = EmployeeDraft {
                name,
                position,
                start_date: start.unwrap_or(today),
            };
            draft.validate()?;
            let employee = backend.create_employee(&draft).await?;
            println!("Added employee #{}: {}", employee.id, employee.name);
        }
        Commands::RestoreEmployee { id } => {
            let employee = backend
                .update_employee(EmployeeId(id), &EmployeePatch::restore())
                .await?;
            println!("Restored employee #{}: {}", employee.id, employee.name);
        }
        Commands::AddTask {
            name,
            description,
            difficulty,
            deadline,
            executors,
            project,
            stage,
        } => {
            let draft = TaskDraft {
                name,
                description,
                difficulty: Difficulty::from_weight(difficulty),
                created_date: Some(today),
                deadline,
                executor_ids: executors.into_iter().map(EmployeeId).collect::<BTreeSet<_>>(),
                project_id: project.map(ProjectId),
                stage_id: stage.map(StageId),
            };
            draft.validate()?;
            let task = backend.create_task(&draft).await?;
            println!("Added task #{}: {}", task.id, task.name);
        }
        Commands::CompleteTask { id, on } => {
            backend
                .complete_task(TaskId(id), on.unwrap_or(today))
                .await?;
            println!("Completed task #{id}");
        }
        Commands::DeleteTask { id } => {
            backend.delete_task(TaskId(id)).await?;
            println!("Deleted task #{id}");
        }
        Commands::CloseProject { id, on } => {
            backend
                .close_project(ProjectId(id), on.unwrap_or(today))
                .await?;
            println!("Closed project #{id}");
        }
        Commands::DeleteProject { id } => {
            backend.delete_project(ProjectId(id)).await?;
            println!("Deleted project #{id}");
        }
    }

    Ok(())
}

fn period_or_month(from: Option<Day>, to: Option<Day>, today: Day) -> Result<Period> {
    match (from, to) {
        (Some(from), Some(to)) => Ok(Period::new(from, to)?),
        (None, None) => Ok(Period::current_month(today)),
        _ => anyhow::bail!("--from and --to must be given together"),
    }
}

fn print_view<T>(label: &str, view: &taskbase_state::ViewData<T>, render: impl FnOnce(&T)) {
    if let Some(error) = view.error() {
        println!("  ({label} unavailable: {error})");
    }
    if let Some(value) = view.value() {
        render(value);
    }
}
