use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub String);

impl TicketId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "BAIXA")]
    Low,
    #[serde(rename = "MEDIA")]
    Medium,
    #[serde(rename = "ALTA")]
    High,
}

impl Priority {
    /// Display and report order, highest first.
    pub const ORDERED: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "BAIXA",
            Priority::Medium => "MEDIA",
            Priority::High => "ALTA",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Priority::Low => "Prioridade Baixa",
            Priority::Medium => "Prioridade Média",
            Priority::High => "Prioridade Alta",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "baixa" | "low" => Ok(Priority::Low),
            "media" | "média" | "medium" => Ok(Priority::Medium),
            "alta" | "high" => Ok(Priority::High),
            other => Err(format!(
                "unknown priority '{other}' (expected ALTA, MEDIA or BAIXA)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "AGUARDANDO")]
    Waiting,
    #[serde(rename = "EM ANDAMENTO")]
    InProgress,
    #[serde(rename = "CONCLUÍDO")]
    Done,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Waiting => "AGUARDANDO",
            Status::InProgress => "EM ANDAMENTO",
            Status::Done => "CONCLUÍDO",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "aguardando" | "waiting" => Ok(Status::Waiting),
            "em andamento" | "in progress" => Ok(Status::InProgress),
            "concluído" | "concluido" | "done" => Ok(Status::Done),
            _ => Err(format!(
                "unknown status '{}' (expected AGUARDANDO, EM ANDAMENTO or CONCLUÍDO)",
                value.trim()
            )),
        }
    }
}

/// A persisted ticket. Field names are the stored JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub prioridade: Priority,
    pub cliente: String,
    pub ticket_itop: String,
    #[serde(default)]
    pub observacao: String,
    pub responsavel: String,
    #[serde(default)]
    pub linkcall: String,
    #[serde(default)]
    pub datahora: String,
    #[serde(default)]
    pub instancia: String,
    pub status: Status,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    pub fn from_new(fields: NewTicket, id: TicketId, now: DateTime<Utc>) -> Self {
        let stamp = now.trunc_subsecs(3);
        Self {
            id,
            prioridade: fields.prioridade,
            cliente: fields.cliente,
            ticket_itop: fields.ticket_itop,
            observacao: fields.observacao,
            responsavel: fields.responsavel,
            linkcall: fields.linkcall,
            datahora: fields.datahora,
            instancia: fields.instancia,
            status: fields.status,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    /// Replaces the fields present in `patch` and refreshes `updated_at`.
    /// The timestamp never moves backwards, even if the clock does.
    pub fn apply(&mut self, patch: TicketPatch, now: DateTime<Utc>) {
        let TicketPatch {
            prioridade,
            cliente,
            ticket_itop,
            observacao,
            responsavel,
            linkcall,
            datahora,
            instancia,
            status,
        } = patch;

        if let Some(value) = prioridade {
            self.prioridade = value;
        }
        if let Some(value) = cliente {
            self.cliente = value;
        }
        if let Some(value) = ticket_itop {
            self.ticket_itop = value;
        }
        if let Some(value) = observacao {
            self.observacao = value;
        }
        if let Some(value) = responsavel {
            self.responsavel = value;
        }
        if let Some(value) = linkcall {
            self.linkcall = value;
        }
        if let Some(value) = datahora {
            self.datahora = value;
        }
        if let Some(value) = instancia {
            self.instancia = value;
        }
        if let Some(value) = status {
            self.status = value;
        }

        let stamp = now.trunc_subsecs(3);
        self.updated_at = stamp.max(self.updated_at).max(self.created_at);
    }
}

/// Caller-supplied fields of a ticket; identity and timestamps belong to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub prioridade: Priority,
    pub cliente: String,
    pub ticket_itop: String,
    pub observacao: String,
    pub responsavel: String,
    pub linkcall: String,
    pub datahora: String,
    pub instancia: String,
    pub status: Status,
}

impl NewTicket {
    /// Every entry field except `observacao` is required.
    pub fn validate(&self) -> AppResult<()> {
        let required = [
            ("cliente", self.cliente.as_str()),
            ("ticket_itop", self.ticket_itop.as_str()),
            ("responsavel", self.responsavel.as_str()),
            ("linkcall", self.linkcall.as_str()),
            ("datahora", self.datahora.as_str()),
            ("instancia", self.instancia.as_str()),
        ];
        reject_blank(&required, "missing required field(s)")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketPatch {
    pub prioridade: Option<Priority>,
    pub cliente: Option<String>,
    pub ticket_itop: Option<String>,
    pub observacao: Option<String>,
    pub responsavel: Option<String>,
    pub linkcall: Option<String>,
    pub datahora: Option<String>,
    pub instancia: Option<String>,
    pub status: Option<Status>,
}

impl TicketPatch {
    pub fn is_empty(&self) -> bool {
        self == &TicketPatch::default()
    }

    /// A patch may leave required fields out but cannot blank them.
    pub fn validate(&self) -> AppResult<()> {
        let present = [
            ("cliente", self.cliente.as_deref()),
            ("ticket_itop", self.ticket_itop.as_deref()),
            ("responsavel", self.responsavel.as_deref()),
            ("linkcall", self.linkcall.as_deref()),
            ("datahora", self.datahora.as_deref()),
            ("instancia", self.instancia.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect::<Vec<_>>();
        reject_blank(&present, "required field(s) cannot be blank")
    }
}

fn reject_blank(fields: &[(&str, &str)], message: &str) -> AppResult<()> {
    let blank = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();

    if blank.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{message}: {}",
            blank.join(", ")
        )))
    }
}

/// `toISOString`-shaped timestamps: UTC with a `Z` suffix and three fraction
/// digits. Finer precision is written out in full so reads return the same instant.
mod iso_millis {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let format = if value.timestamp_subsec_nanos() % 1_000_000 == 0 {
            SecondsFormat::Millis
        } else {
            SecondsFormat::AutoSi
        };
        serializer.serialize_str(&value.to_rfc3339_opts(format, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
