//! Purpose: Hold top-level CLI command dispatch for `jsonmap`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Each command prints one JSON document on success and nothing else on stdout.

use super::*;

pub(super) fn dispatch_command(command: Command) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "jsonmap", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Save {
            path,
            json,
            indent,
            sort_keys,
            trailing_newline,
            durable,
        } => {
            let input = read_document_input(json)?;
            let mapping: Mapping = parse_mapping(&input)?;
            let durability = if durable {
                Durability::Flush
            } else {
                Durability::Fast
            };
            let options = SaveOptions::new()
                .with_indent(indent)
                .with_sort_keys(sort_keys)
                .with_trailing_newline(trailing_newline)
                .with_durability(durability);
            save_with(&mapping, &path, &options)?;
            emit_json(
                json!({
                    "saved": {
                        "path": path.display().to_string(),
                        "keys": mapping.len(),
                    }
                }),
                false,
            );
            Ok(RunOutcome::ok())
        }
        Command::Load { path, compact } => {
            let mapping = load(&path)?;
            emit_json(Value::Object(mapping), !compact);
            Ok(RunOutcome::ok())
        }
        Command::Check { path } => {
            let mapping = load(&path)?;
            emit_json(
                json!({
                    "path": path.display().to_string(),
                    "keys": mapping.len(),
                    "ok": true,
                }),
                false,
            );
            Ok(RunOutcome::ok())
        }
    }
}
