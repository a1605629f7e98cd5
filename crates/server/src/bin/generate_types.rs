use std::{env, fs, path::PathBuf};

use ts_rs::TS;

const HEADER: &str = "// This file was generated by `generate_types`. Do not edit it by hand.\n\n";

fn generate_types_content() -> String {
    let decls = [
        db::models::user::UserRole::decl(),
        db::models::user::User::decl(),
        db::models::user::CreateUser::decl(),
        db::models::user::UpdateUser::decl(),
        db::models::project::Project::decl(),
        db::models::project::ProjectMember::decl(),
        db::models::project::CreateProject::decl(),
        db::models::project::UpdateProject::decl(),
        db::models::project::AddProjectMember::decl(),
        db::models::task::TaskStatus::decl(),
        db::models::task::TaskPriority::decl(),
        db::models::task::Task::decl(),
        db::models::task::CreateTask::decl(),
        db::models::task::TaskFilter::decl(),
        db::models::task::UpdateTaskStatus::decl(),
        db::models::task::UpdateTaskAssignee::decl(),
        db::models::task::UpdateTaskPriority::decl(),
        db::models::task::UpdateTaskTitle::decl(),
        db::models::task::UpdateTaskDescription::decl(),
    ];

    let body = decls
        .iter()
        .map(|decl| format!("export {}", decl.trim_start_matches("export ")))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{HEADER}{body}\n")
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let check = args.iter().any(|arg| arg == "--check");
    let output = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("shared/types.ts"));

    let generated = generate_types_content();

    if check {
        let current = fs::read_to_string(&output).unwrap_or_default();
        if current == generated {
            println!("✅ {} is up to date.", output.display());
            return;
        }
        eprintln!("❌ {} is stale. Run `cargo run --bin generate_types`.", output.display());
        std::process::exit(1);
    }

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        eprintln!("Failed to create {}: {e}", parent.display());
        std::process::exit(1);
    }
    if let Err(e) = fs::write(&output, generated) {
        eprintln!("Failed to write {}: {e}", output.display());
        std::process::exit(1);
    }
    println!("✅ Wrote TypeScript types to {}", output.display());
}
