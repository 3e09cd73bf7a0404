use anyhow::{Context, Result};
use std::path::Path;

use crate::form::{FormSession, SubmitOutcome};
use crate::gemini::{self, GeminiClient};
use crate::models::BudgetStatus;
use crate::repo::{backup_filename, BudgetRepo};
use crate::sync;
use crate::util::{format_brl, shellexpand, truncate};

pub(crate) fn as_cli(args: &[String], repo: &mut BudgetRepo) -> Result<()> {
    match args[1].as_str() {
        "list" | "ls" => cli_list(&args[2..], repo),
        "summary" | "s" => cli_summary(repo),
        "show" => cli_show(&args[2..], repo),
        "new" => cli_new(&args[2..], repo),
        "edit" => cli_edit(&args[2..], repo),
        "delete" | "rm" => cli_delete(&args[2..], repo),
        "export" => cli_export(&args[2..], repo),
        "import" => cli_import(&args[2..], repo),
        "edit-image" => cli_edit_image(&args[2..], repo),
        "settings" => cli_settings(&args[2..], repo),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("construcost {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("ConstruCost — budget (quote) tracker for construction services");
    println!();
    println!("Usage: construcost <command>");
    println!();
    println!("Commands:");
    println!("  list [--status <s>] [--search <text>]   List budgets");
    println!("  summary                                 Print dashboard statistics");
    println!("  show <id>                               Show one budget in detail");
    println!("  new [field flags]                       Create a budget");
    println!("  edit <id> [field flags]                 Edit a budget");
    println!("    --client <name> --description <text> --amount <n> --discount <n>");
    println!("    --date <YYYY-MM-DD> --requester <name> --status <s>");
    println!("    --order-number <po> --order-date <YYYY-MM-DD> --invoice-number <nf>");
    println!("    --order-confirmation --invoice-sent --send-to-client");
    println!("    --attach <file>       Attach a file (repeatable)");
    println!("    --extract             AI autofill from the attached files");
    println!("    --yes                 Save past blocking warnings");
    println!("  delete <id>                             Delete a budget");
    println!("  export [path] [--csv]                   Export backup JSON (or CSV)");
    println!("  import <backup.json>                    Replace collection from a backup");
    println!("  edit-image <image> <instruction> [-o <out>]");
    println!("                                          AI image edit");
    println!("  settings [show|set <k> <v>|connect|disconnect]");
    println!("  --help, -h                              Show this help");
    println!("  --version, -V                           Show version");
}

// ── Queries ──────────────────────────────────────────────────

fn cli_list(args: &[String], repo: &BudgetRepo) -> Result<()> {
    let status = match flag_value(args, "--status") {
        Some(s) => Some(
            BudgetStatus::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown status: {s}"))?,
        ),
        None => None,
    };
    let search = flag_value(args, "--search").map(str::to_lowercase);

    let budgets = repo.list()?;
    let filtered: Vec<_> = budgets
        .iter()
        .filter(|b| status.is_none_or(|s| b.status == s))
        .filter(|b| {
            search.as_deref().is_none_or(|q| {
                b.client_name.to_lowercase().contains(q)
                    || b.service_description.to_lowercase().contains(q)
            })
        })
        .collect();

    if filtered.is_empty() {
        println!("No budgets");
        return Ok(());
    }

    println!(
        "{:<10} {:<12} {:<24} {:<30} {:>16} {}",
        "ID", "Date", "Client", "Description", "Net Value", "Status"
    );
    println!("{}", "─".repeat(110));
    for b in &filtered {
        println!(
            "{:<10} {:<12} {:<24} {:<30} {:>16} {}",
            truncate(b.id.as_deref().unwrap_or("-"), 10),
            b.date,
            truncate(&b.client_name, 24),
            truncate(&b.service_description, 30),
            format_brl(b.net_value()),
            b.status,
        );
    }
    Ok(())
}

fn cli_summary(repo: &BudgetRepo) -> Result<()> {
    let stats = repo.stats()?;
    println!("ConstruCost — Dashboard");
    println!("{}", "─".repeat(40));
    println!("  Total de Orçamentos: {}", stats.total_estimates);
    println!("  Aprovados:           {}", stats.approved_count);
    println!("  Pendentes:           {}", stats.pending_count);
    println!("  Não Aprovados:       {}", stats.rejected_count);
    println!(
        "  Valor Aprovado:      {}",
        format_brl(stats.total_value_approved)
    );
    println!(
        "  Valor Pendente:      {}",
        format_brl(stats.total_value_pending)
    );
    println!("  Faturas Pendentes:   {}", stats.invoice_pending_count);
    Ok(())
}

fn cli_show(args: &[String], repo: &BudgetRepo) -> Result<()> {
    let id = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: construcost show <id>"))?;
    let budget = repo
        .get(id)?
        .ok_or_else(|| anyhow::anyhow!("Budget '{id}' not found"))?;

    println!("Orçamento {}", budget.id.as_deref().unwrap_or("-"));
    println!("{}", "─".repeat(40));
    println!("  Data:        {}", budget.date);
    println!("  Cliente:     {}", budget.client_name);
    println!("  Descrição:   {}", budget.service_description);
    println!("  Valor:       {}", format_brl(budget.budget_amount));
    println!("  Desconto:    {}", format_brl(budget.discount));
    println!("  Líquido:     {}", format_brl(budget.net_value()));
    println!("  Status:      {}", budget.status);
    println!("  Solicitante: {}", budget.requester);
    if let Some(order_number) = &budget.order_number {
        println!("  Pedido:      {order_number}");
    }
    if let Some(order_date) = &budget.order_date {
        println!("  Data Pedido: {order_date}");
    }
    if let Some(invoice_number) = &budget.invoice_number {
        println!("  Nota Fiscal: {invoice_number}");
    }
    println!(
        "  Flags:       pedido confirmado={} fatura enviada={} enviado ao cliente={}",
        budget.order_confirmation, budget.invoice_sent, budget.send_to_client
    );
    if !budget.files.is_empty() {
        println!("  Arquivos:");
        for f in &budget.files {
            println!("    [{:?}] {} ({})", f.kind, f.name, f.id);
        }
    }
    Ok(())
}

// ── Create / edit ────────────────────────────────────────────

fn cli_new(args: &[String], repo: &mut BudgetRepo) -> Result<()> {
    let session = FormSession::new();
    run_session(session, args, repo)
}

fn cli_edit(args: &[String], repo: &mut BudgetRepo) -> Result<()> {
    let id = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .ok_or_else(|| anyhow::anyhow!("Usage: construcost edit <id> [field flags]"))?;
    let budget = repo
        .get(id)?
        .ok_or_else(|| anyhow::anyhow!("Budget '{id}' not found"))?;
    let session = FormSession::edit(budget);
    run_session(session, &args[1..], repo)
}

fn run_session(mut session: FormSession, args: &[String], repo: &mut BudgetRepo) -> Result<()> {
    apply_field_flags(&mut session, args)?;

    let attachments = flag_values(args, "--attach");
    if !attachments.is_empty() {
        let paths: Vec<String> = attachments.iter().map(|a| shellexpand(a)).collect();
        session.attach_paths(&paths)?;
        println!("Attached {} file(s)", attachments.len());
    }

    if has_flag(args, "--extract") {
        if session.draft().files.is_empty() {
            anyhow::bail!("Nothing to extract: attach files first (--attach <file>)");
        }
        let client = gemini_client(repo)?;
        let payloads = gemini::payloads_from_files(&session.draft().files);
        println!("Analisando {} arquivo(s)...", payloads.len());
        let extracted = client
            .extract_budget_data(&payloads)
            .context("Não foi possível extrair dados dos arquivos. Tente novamente.")?;
        session.apply_extracted(&extracted);
        match &session.draft().order_number {
            Some(po) => println!("Pedido identificado ({po})! Orçamento APROVADO."),
            None => println!("Dados extraídos dos arquivos com sucesso!"),
        }
    }

    let outcome = session.submit(repo, has_flag(args, "--yes"), &mut |label| {
        println!("{label}");
    })?;

    match outcome {
        SubmitOutcome::Saved(budget) => {
            println!(
                "Saved budget {} ({})",
                budget.id.as_deref().unwrap_or("-"),
                budget.client_name
            );
            Ok(())
        }
        SubmitOutcome::Blocked(warnings) => {
            eprintln!("Submission blocked:");
            for w in &warnings {
                eprintln!("  - {w}");
            }
            anyhow::bail!("Fix the warnings above or pass --yes to save anyway");
        }
    }
}

fn apply_field_flags(session: &mut FormSession, args: &[String]) -> Result<()> {
    let draft = session.draft_mut();
    if let Some(v) = flag_value(args, "--client") {
        draft.client_name = v.to_string();
    }
    if let Some(v) = flag_value(args, "--description") {
        draft.service_description = v.to_string();
    }
    if let Some(v) = flag_value(args, "--amount") {
        draft.budget_amount = v.parse().with_context(|| format!("Invalid amount: {v}"))?;
    }
    if let Some(v) = flag_value(args, "--discount") {
        draft.discount = v.parse().with_context(|| format!("Invalid discount: {v}"))?;
    }
    if let Some(v) = flag_value(args, "--date") {
        draft.date = v.to_string();
    }
    if let Some(v) = flag_value(args, "--requester") {
        draft.requester = v.to_string();
    }
    if let Some(v) = flag_value(args, "--status") {
        draft.status =
            BudgetStatus::parse(v).ok_or_else(|| anyhow::anyhow!("Unknown status: {v}"))?;
    }
    if let Some(v) = flag_value(args, "--order-number") {
        draft.order_number = Some(v.to_string());
        // Mirrors the form behavior: a known order number confirms the order.
        draft.order_confirmation = true;
    }
    if let Some(v) = flag_value(args, "--order-date") {
        draft.order_date = Some(v.to_string());
    }
    if let Some(v) = flag_value(args, "--invoice-number") {
        draft.invoice_number = Some(v.to_string());
    }
    if has_flag(args, "--order-confirmation") {
        draft.order_confirmation = true;
    }
    if has_flag(args, "--invoice-sent") {
        draft.invoice_sent = true;
    }
    if has_flag(args, "--send-to-client") {
        draft.send_to_client = true;
    }
    Ok(())
}

// ── Delete / export / import ─────────────────────────────────

fn cli_delete(args: &[String], repo: &mut BudgetRepo) -> Result<()> {
    let id = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: construcost delete <id>"))?;
    // Deleting an absent id is defined as a silent no-op.
    repo.delete(id)?;
    println!("Deleted {id}");
    Ok(())
}

fn cli_export(args: &[String], repo: &BudgetRepo) -> Result<()> {
    let as_csv = has_flag(args, "--csv");
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            if as_csv {
                format!("{home}/orcamentos.csv")
            } else {
                format!("{home}/{}", backup_filename())
            }
        });

    let count = if as_csv {
        repo.export_csv(Path::new(&output_path))?
    } else {
        repo.export_backup(Path::new(&output_path))?
    };
    println!("Exported {count} budget(s) to {output_path}");
    Ok(())
}

fn cli_import(args: &[String], repo: &mut BudgetRepo) -> Result<()> {
    let file_path = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: construcost import <backup.json>"))?;
    let path = shellexpand(file_path);
    if !Path::new(&path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    let count = repo.import_backup(Path::new(&path))?;
    println!("Imported {count} budget(s) from {path}");
    Ok(())
}

// ── AI image editing ─────────────────────────────────────────

fn cli_edit_image(args: &[String], repo: &BudgetRepo) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: construcost edit-image <image> <instruction> [-o <out>]");
    }
    let image_path = shellexpand(&args[0]);
    let instruction = &args[1];
    let content = std::fs::read(&image_path)
        .with_context(|| format!("Failed to read image: {image_path}"))?;

    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&content);

    let client = gemini_client(repo)?;
    println!("Editando imagem...");
    let edited = client.edit_image(&encoded, instruction)?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(edited)
        .context("AI service returned an unreadable image")?;

    let out_path = flag_value(args, "-o").map(shellexpand).unwrap_or_else(|| {
        let stem = Path::new(&image_path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".into());
        format!("{stem}_edited.png")
    });
    std::fs::write(&out_path, decoded)
        .with_context(|| format!("Failed to write image: {out_path}"))?;
    println!("Wrote {out_path}");
    Ok(())
}

// ── Settings ─────────────────────────────────────────────────

fn cli_settings(args: &[String], repo: &mut BudgetRepo) -> Result<()> {
    match args.first().map(String::as_str) {
        None | Some("show") => {
            let s = repo.settings()?;
            println!("Settings");
            println!("{}", "─".repeat(40));
            println!(
                "  Drive:               {}",
                if s.drive_connected {
                    format!("conectado ({})", s.drive_folder_name)
                } else {
                    "desconectado".into()
                }
            );
            println!("  Auto-sync:           {}", s.auto_sync);
            println!("  Email notifications: {}", s.email_notifications);
            println!(
                "  Google Client ID:    {}",
                if s.google_client_id.is_empty() { "-" } else { "(set)" }
            );
            println!(
                "  Google API key:      {}",
                if s.google_api_key.is_empty() { "-" } else { "(set)" }
            );
            println!(
                "  Google Sheet ID:     {}",
                if s.google_sheet_id.is_empty() { "-" } else { s.google_sheet_id.as_str() }
            );
            Ok(())
        }
        Some("set") => {
            let (key, value) = match (args.get(1), args.get(2)) {
                (Some(k), Some(v)) => (k.as_str(), v.as_str()),
                _ => anyhow::bail!("Usage: construcost settings set <key> <value>"),
            };
            let mut s = repo.settings()?;
            match key {
                "auto-sync" => s.auto_sync = parse_bool(value)?,
                "email-notifications" => s.email_notifications = parse_bool(value)?,
                "client-id" => s.google_client_id = value.to_string(),
                "api-key" => s.google_api_key = value.to_string(),
                "sheet-id" => s.google_sheet_id = value.to_string(),
                other => anyhow::bail!(
                    "Unknown setting: {other} (auto-sync, email-notifications, client-id, api-key, sheet-id)"
                ),
            }
            repo.save_settings(&s)?;
            println!("Saved");
            Ok(())
        }
        Some("connect") => {
            let mut s = repo.settings()?;
            sync::connect_drive(&mut s, &mut |label| println!("{label}"));
            repo.save_settings(&s)?;
            println!("Drive conectado: {}", s.drive_folder_name);
            Ok(())
        }
        Some("disconnect") => {
            let mut s = repo.settings()?;
            sync::disconnect_drive(&mut s);
            repo.save_settings(&s)?;
            println!("Drive desconectado");
            Ok(())
        }
        Some(other) => {
            anyhow::bail!("Unknown settings command: {other} (show, set, connect, disconnect)")
        }
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => anyhow::bail!("Expected true/false, got: {other}"),
    }
}

/// API key comes from the settings document, the environment as fallback.
fn gemini_client(repo: &BudgetRepo) -> Result<GeminiClient> {
    let settings = repo.settings()?;
    let api_key = if !settings.google_api_key.is_empty() {
        settings.google_api_key
    } else {
        std::env::var("GEMINI_API_KEY").unwrap_or_default()
    };
    if api_key.is_empty() {
        anyhow::bail!(
            "No API key configured. Run `construcost settings set api-key <key>` or set GEMINI_API_KEY"
        );
    }
    GeminiClient::new(api_key)
}

// ── Flag parsing ─────────────────────────────────────────────

pub(crate) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

pub(crate) fn flag_values<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .collect()
}

pub(crate) fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[cfg(test)]
mod tests;
