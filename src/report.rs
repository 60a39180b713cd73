//! HTML handoff report rendering.
//!
//! Rendering is a pure function of the tickets, the already-encoded logo and
//! the generation instant, so it can be exercised without any I/O.

use std::fmt::Write as _;

use chrono::{DateTime, Local};

use crate::domain::ticket::{Priority, Ticket};

pub const REPORT_MEDIA_TYPE: &str = "text/html";

const PRODUCT_TAGLINE: &str = "Gerencie e acompanhe seus tickets de suporte";
const FOOTER: &str = "Gerado automaticamente pelo sistema de repasse";
const EMPTY_PLACEHOLDER: &str = "N/A";

const STYLE: &str = r#"
      body {
        font-family: Arial, sans-serif;
        padding: 40px;
        max-width: 800px;
        margin: 0 auto;
        background: linear-gradient(to bottom right, #eff6ff, #ffffff, #eff6ff);
      }
      .header-container {
        background: #ffffff;
        border-top: 4px solid #2563eb;
        border-radius: 16px;
        box-shadow: 0 4px 12px rgba(0,0,0,0.1);
        padding: 32px;
        margin-bottom: 32px;
      }
      .header-flex { display: flex; align-items: center; gap: 16px; flex-wrap: wrap; }
      .logo { width: 80px; height: 80px; }
      .title { font-size: 32px; font-weight: bold; color: #1f2937; margin: 0; }
      .title span { color: #2563eb; }
      .subtitle { color: #4b5563; margin-top: 4px; font-size: 14px; }
      .date { text-align: right; color: #666; font-size: 12px; margin-bottom: 20px; }
      .ticket {
        margin-bottom: 25px;
        border: 2px solid #ddd;
        border-radius: 8px;
        padding: 15px;
        page-break-inside: avoid;
      }
      .ticket-priority {
        padding: 8px 16px;
        border-radius: 6px;
        font-weight: bold;
        display: inline-block;
        margin-bottom: 10px;
        text-transform: uppercase;
      }
      .priority-baixa { background-color: #22c55e; color: white; }
      .priority-media { background-color: #eab308; color: white; }
      .priority-alta { background-color: #ef4444; color: white; }
      .ticket-field { margin: 8px 0; }
      .field-label { font-weight: bold; color: #374151; }
      .field-value { color: #4b5563; margin-left: 5px; }
      .footer {
        text-align: center;
        color: #9ca3af;
        font-size: 11px;
        margin-top: 40px;
        padding-top: 20px;
        border-top: 1px solid #e5e7eb;
      }
"#;

/// Stable sort by priority rank: every HIGH ticket first, then MEDIUM, then LOW,
/// each group keeping its input order.
pub fn sort_by_priority(tickets: &[Ticket]) -> Vec<&Ticket> {
    let mut sorted = tickets.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|ticket| ticket.prioridade.rank());
    sorted
}

/// `DD/MM/YYYY HH:MM`, the pt-BR short date-time shape.
pub fn format_generated_at(at: &DateTime<Local>) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

/// Download name for a report generated at `at`. Unique per millisecond only.
pub fn report_file_name(at: &DateTime<Local>) -> String {
    format!("repasse_tickets_{}.html", at.timestamp_millis())
}

pub fn render_html(tickets: &[Ticket], logo_data_url: &str, generated_at: &DateTime<Local>) -> String {
    let mut html = String::with_capacity(4096 + tickets.len() * 1024);

    html.push_str("<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"UTF-8\">\n");
    html.push_str("    <title>Repasse de Tickets</title>\n    <style>");
    html.push_str(STYLE);
    html.push_str("    </style>\n  </head>\n  <body>\n");

    let _ = write!(
        html,
        concat!(
            "    <div class=\"header-container\">\n",
            "      <div class=\"header-flex\">\n",
            "        <img src=\"{logo}\" alt=\"Logo\" class=\"logo\" />\n",
            "        <div>\n",
            "          <h1 class=\"title\"><span>T</span>urno<span>L</span>ink</h1>\n",
            "          <p class=\"subtitle\">{tagline}</p>\n",
            "        </div>\n",
            "      </div>\n",
            "    </div>\n",
            "    <div class=\"date\">Gerado em: {now}</div>\n",
        ),
        logo = escape_html(logo_data_url),
        tagline = PRODUCT_TAGLINE,
        now = format_generated_at(generated_at),
    );

    for ticket in sort_by_priority(tickets) {
        render_ticket(&mut html, ticket);
    }

    let _ = write!(
        html,
        "    <div class=\"footer\">{FOOTER}</div>\n  </body>\n</html>\n"
    );
    html
}

fn render_ticket(html: &mut String, ticket: &Ticket) {
    let observacao = if ticket.observacao.is_empty() {
        EMPTY_PLACEHOLDER
    } else {
        ticket.observacao.as_str()
    };

    let _ = write!(
        html,
        "    <div class=\"ticket\">\n      <div class=\"ticket-priority {}\">PRIORIDADE: {}</div>\n",
        priority_class(ticket.prioridade),
        ticket.prioridade.as_str(),
    );

    let fields = [
        ("CLIENTE", ticket.cliente.as_str()),
        ("TICKET / ITOP", ticket.ticket_itop.as_str()),
        ("OBSERVAÇÃO", observacao),
        ("RESPONSÁVEL", ticket.responsavel.as_str()),
        ("LINK CALL", ticket.linkcall.as_str()),
        ("DATA E HORA", ticket.datahora.as_str()),
        ("INSTÂNCIA", ticket.instancia.as_str()),
        ("STATUS", ticket.status.as_str()),
    ];
    for (label, value) in fields {
        let _ = write!(
            html,
            concat!(
                "      <div class=\"ticket-field\">\n",
                "        <span class=\"field-label\">{}:</span>\n",
                "        <span class=\"field-value\">{}</span>\n",
                "      </div>\n",
            ),
            label,
            escape_html(value),
        );
    }

    html.push_str("    </div>\n");
}

fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "priority-alta",
        Priority::Medium => "priority-media",
        Priority::Low => "priority-baixa",
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
