use std::io::{self, BufRead, Write};

use chrono::Local;
use clap::Args;

use crate::context::AppContext;
use crate::domain::ticket::{NewTicket, Priority, Status, Ticket, TicketId, TicketPatch};
use crate::error::{AppError, AppResult};
use crate::workflow::ticket::{group_by_priority, sorted_newest_first};

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Client name.
    #[arg(long)]
    pub cliente: String,
    /// External (iTop) ticket reference.
    #[arg(long)]
    pub ticket_itop: String,
    /// Owner of the ticket.
    #[arg(long)]
    pub responsavel: String,
    /// Meeting or call link.
    #[arg(long)]
    pub linkcall: String,
    /// Free-text date and time, as written by the operator.
    #[arg(long)]
    pub datahora: String,
    /// Deployment instance.
    #[arg(long)]
    pub instancia: String,
    #[arg(long, default_value = "")]
    pub observacao: String,
    #[arg(long, default_value = "AGUARDANDO")]
    pub status: Status,
    #[arg(long, default_value = "MEDIA")]
    pub prioridade: Priority,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only show one priority column.
    #[arg(long)]
    pub priority: Option<Priority>,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long)]
    pub cliente: Option<String>,
    #[arg(long)]
    pub ticket_itop: Option<String>,
    #[arg(long)]
    pub responsavel: Option<String>,
    #[arg(long)]
    pub linkcall: Option<String>,
    #[arg(long)]
    pub datahora: Option<String>,
    #[arg(long)]
    pub instancia: Option<String>,
    #[arg(long)]
    pub observacao: Option<String>,
    #[arg(long)]
    pub status: Option<Status>,
    #[arg(long)]
    pub prioridade: Option<Priority>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Cancelled,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    pub id: String,
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

impl From<AddArgs> for NewTicket {
    fn from(args: AddArgs) -> Self {
        NewTicket {
            prioridade: args.prioridade,
            cliente: args.cliente.trim().to_string(),
            ticket_itop: args.ticket_itop.trim().to_string(),
            observacao: args.observacao,
            responsavel: args.responsavel.trim().to_string(),
            linkcall: args.linkcall.trim().to_string(),
            datahora: args.datahora.trim().to_string(),
            instancia: args.instancia.trim().to_string(),
            status: args.status,
        }
    }
}

impl UpdateArgs {
    fn into_patch(self) -> (TicketId, TicketPatch) {
        let patch = TicketPatch {
            prioridade: self.prioridade,
            cliente: self.cliente,
            ticket_itop: self.ticket_itop,
            observacao: self.observacao,
            responsavel: self.responsavel,
            linkcall: self.linkcall,
            datahora: self.datahora,
            instancia: self.instancia,
            status: self.status,
        };
        (TicketId(self.id), patch)
    }
}

pub fn run_add(ctx: &AppContext, args: AddArgs) -> AppResult<Ticket> {
    let fields = NewTicket::from(args);
    fields.validate()?;
    Ok(ctx.store.add(fields)?)
}

pub fn run_list(ctx: &AppContext, args: ListArgs) -> AppResult<()> {
    let loaded = ctx.store.try_load_all().unwrap_or_else(|err| {
        eprintln!("Warning: {err}; showing an empty list.");
        Vec::new()
    });
    let tickets = sorted_newest_first(loaded);
    if tickets.is_empty() {
        println!("Nenhum ticket cadastrado ainda. Use `turnolink add` para adicionar o primeiro.");
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    for group in group_by_priority(&tickets)
        .into_iter()
        .filter(|group| args.priority.is_none_or(|wanted| wanted == group.priority))
    {
        writeln!(stdout, "== {} ({} ticket(s))", group.title(), group.count())?;
        if group.tickets.is_empty() {
            writeln!(stdout, "   Nenhum ticket nesta categoria")?;
        }
        for ticket in &group.tickets {
            write_ticket(&mut stdout, ticket)?;
        }
        writeln!(stdout)?;
    }
    Ok(())
}

pub fn run_update(ctx: &AppContext, args: UpdateArgs) -> AppResult<bool> {
    let (id, patch) = args.into_patch();
    if patch.is_empty() {
        return Err(AppError::Validation("no fields to update".to_string()));
    }
    patch.validate()?;

    let exists = is_known(ctx, id.as_str());
    ctx.store.update(&id, patch)?;
    Ok(exists)
}

pub fn run_delete(ctx: &AppContext, args: DeleteArgs) -> AppResult<DeleteOutcome> {
    if !is_known(ctx, &args.id) {
        return Ok(DeleteOutcome::NotFound);
    }
    if !args.yes && !confirm("Tem certeza que deseja excluir este ticket?")? {
        return Ok(DeleteOutcome::Cancelled);
    }
    ctx.store.delete(&TicketId(args.id))?;
    Ok(DeleteOutcome::Deleted)
}

fn is_known(ctx: &AppContext, id: &str) -> bool {
    ctx.store
        .load_all()
        .iter()
        .any(|ticket| ticket.id.as_str() == id)
}

fn write_ticket(out: &mut impl Write, ticket: &Ticket) -> io::Result<()> {
    writeln!(
        out,
        "-- [{}] {} | Ticket: {} | {}",
        ticket.prioridade, ticket.cliente, ticket.ticket_itop, ticket.status
    )?;
    writeln!(out, "   id: {}", ticket.id)?;
    if !ticket.observacao.is_empty() {
        writeln!(out, "   {}", ticket.observacao)?;
    }
    writeln!(out, "   responsavel: {}", ticket.responsavel)?;
    writeln!(out, "   call: {}", ticket.linkcall)?;
    if !ticket.datahora.is_empty() || !ticket.instancia.is_empty() {
        writeln!(out, "   {} @ {}", ticket.datahora, ticket.instancia)?;
    }
    writeln!(
        out,
        "   criado em {}",
        ticket
            .created_at
            .with_timezone(&Local)
            .format("%d/%m/%Y %H:%M")
    )
}

fn confirm(question: &str) -> AppResult<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{question} [s/N]: ")?;
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(matches!(
        input.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::config::{AppConfig, LogoSource};
    use crate::infra::asset::BundledLogo;
    use crate::infra::clock::SystemClock;
    use crate::infra::memory::MemoryBlobStorage;

    fn context() -> AppContext {
        AppContext::new(
            AppConfig {
                storage_dir: PathBuf::from("unused"),
                export_dir: PathBuf::from("unused"),
                logo: LogoSource::Bundled,
            },
            Arc::new(MemoryBlobStorage::new()),
            Arc::new(BundledLogo),
            Arc::new(SystemClock),
        )
    }

    fn add_args() -> AddArgs {
        AddArgs {
            cliente: " Acme ".to_string(),
            ticket_itop: "T-1".to_string(),
            responsavel: "Ana".to_string(),
            linkcall: "http://x".to_string(),
            datahora: "01/01/2024 10:00".to_string(),
            instancia: "prod".to_string(),
            observacao: String::new(),
            status: Status::Waiting,
            prioridade: Priority::High,
        }
    }

    fn update_args(id: &str) -> UpdateArgs {
        UpdateArgs {
            id: id.to_string(),
            cliente: None,
            ticket_itop: None,
            responsavel: None,
            linkcall: None,
            datahora: None,
            instancia: None,
            observacao: None,
            status: None,
            prioridade: None,
        }
    }

    #[test]
    fn add_validates_before_touching_the_store() {
        let ctx = context();
        let mut args = add_args();
        args.responsavel = "   ".to_string();

        assert!(matches!(run_add(&ctx, args), Err(AppError::Validation(_))));
        assert!(ctx.store.load_all().is_empty());
    }

    #[test]
    fn add_trims_required_fields() {
        let ctx = context();
        let ticket = run_add(&ctx, add_args()).unwrap();
        assert_eq!(ticket.cliente, "Acme");
        assert_eq!(ctx.store.load_all(), vec![ticket]);
    }

    #[test]
    fn update_reports_whether_ticket_existed() {
        let ctx = context();
        let ticket = run_add(&ctx, add_args()).unwrap();

        let mut args = update_args(ticket.id.as_str());
        args.status = Some(Status::Done);
        assert!(run_update(&ctx, args).unwrap());
        assert_eq!(ctx.store.load_all()[0].status, Status::Done);

        let mut args = update_args("missing");
        args.status = Some(Status::Done);
        assert!(!run_update(&ctx, args).unwrap());
    }

    #[test]
    fn update_rejects_empty_or_blank_patches() {
        let ctx = context();
        assert!(matches!(
            run_update(&ctx, update_args("any")),
            Err(AppError::Validation(_))
        ));

        let mut args = update_args("any");
        args.cliente = Some(" ".to_string());
        assert!(matches!(
            run_update(&ctx, args),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn add_requires_date_and_instance() {
        let ctx = context();
        let mut args = add_args();
        args.datahora = String::new();
        args.instancia = "  ".to_string();

        let err = run_add(&ctx, args).unwrap_err().to_string();
        assert!(err.contains("datahora"));
        assert!(err.contains("instancia"));
        assert!(ctx.store.load_all().is_empty());
    }

    #[test]
    fn update_rejects_blank_date_or_instance() {
        let ctx = context();
        let ticket = run_add(&ctx, add_args()).unwrap();

        let mut args = update_args(ticket.id.as_str());
        args.instancia = Some(String::new());
        assert!(matches!(
            run_update(&ctx, args),
            Err(AppError::Validation(_))
        ));
        assert_eq!(ctx.store.load_all()[0].instancia, "prod");
    }

    #[test]
    fn delete_with_yes_skips_prompt() {
        let ctx = context();
        let ticket = run_add(&ctx, add_args()).unwrap();

        let outcome = run_delete(
            &ctx,
            DeleteArgs {
                id: ticket.id.to_string(),
                yes: true,
            },
        )
        .unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(ctx.store.load_all().is_empty());
    }

    #[test]
    fn delete_of_unknown_id_reports_not_found() {
        let ctx = context();
        let ticket = run_add(&ctx, add_args()).unwrap();

        let outcome = run_delete(
            &ctx,
            DeleteArgs {
                id: "missing".to_string(),
                yes: true,
            },
        )
        .unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
        assert_eq!(ctx.store.load_all(), vec![ticket]);
    }

    #[test]
    fn writes_ticket_summary() {
        let ctx = context();
        let ticket = run_add(&ctx, add_args()).unwrap();

        let mut out = Vec::new();
        write_ticket(&mut out, &ticket).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[ALTA] Acme | Ticket: T-1 | AGUARDANDO"));
        assert!(text.contains(&format!("id: {}", ticket.id)));
        assert!(text.contains("01/01/2024 10:00 @ prod"));
    }
}
