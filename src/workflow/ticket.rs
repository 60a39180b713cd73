use crate::domain::ticket::{Priority, Ticket};

/// One list column: every ticket of a single priority.
#[derive(Debug, Clone)]
pub struct PriorityGroup {
    pub priority: Priority,
    pub tickets: Vec<Ticket>,
}

impl PriorityGroup {
    pub fn title(&self) -> &'static str {
        self.priority.title()
    }

    pub fn count(&self) -> usize {
        self.tickets.len()
    }
}

/// Default display order: most recently created first.
pub fn sorted_newest_first(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tickets
}

/// Splits tickets into HIGH, MEDIUM and LOW groups (always all three),
/// preserving the incoming order inside each group.
pub fn group_by_priority(tickets: &[Ticket]) -> Vec<PriorityGroup> {
    Priority::ORDERED
        .iter()
        .map(|priority| PriorityGroup {
            priority: *priority,
            tickets: tickets
                .iter()
                .filter(|ticket| ticket.prioridade == *priority)
                .cloned()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::ticket::{Status, TicketId};

    fn ticket(id: &str, prioridade: Priority, minute: u32) -> Ticket {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 8, minute, 0).unwrap();
        Ticket {
            id: TicketId::from(id),
            prioridade,
            cliente: id.to_string(),
            ticket_itop: "T".to_string(),
            observacao: String::new(),
            responsavel: "R".to_string(),
            linkcall: "L".to_string(),
            datahora: String::new(),
            instancia: String::new(),
            status: Status::Waiting,
            created_at: at,
            updated_at: at,
        }
    }

    fn ids(tickets: &[Ticket]) -> Vec<&str> {
        tickets.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn newest_created_comes_first() {
        let sorted = sorted_newest_first(vec![
            ticket("old", Priority::Low, 1),
            ticket("new", Priority::Low, 30),
            ticket("mid", Priority::Low, 10),
        ]);
        assert_eq!(ids(&sorted), vec!["new", "mid", "old"]);
    }

    #[test]
    fn groups_into_three_columns_in_priority_order() {
        let tickets = vec![
            ticket("m", Priority::Medium, 1),
            ticket("h1", Priority::High, 2),
            ticket("h2", Priority::High, 3),
        ];

        let groups = group_by_priority(&tickets);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].title(), "Prioridade Alta");
        assert_eq!(ids(&groups[0].tickets), vec!["h1", "h2"]);
        assert_eq!(groups[1].count(), 1);
        assert_eq!(groups[2].priority, Priority::Low);
        assert_eq!(groups[2].count(), 0);
    }
}
