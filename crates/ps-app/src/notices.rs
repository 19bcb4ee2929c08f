//! User-facing notices raised from dashboard events
//!
//! The board subscribes to the bus once; each cycle the runner drains it and
//! logs what piled up, the way the dashboard shows a transient toast.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use ps_core::events::{
    BudgetRequestDispatched, BudgetRequestFailed, BudgetRequestReverted, DatasetFetchFailed, Event, ReportEmpty,
    ReportExported, ReportFailed,
};
use ps_core::EventBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn log(&self) {
        match self.kind {
            NoticeKind::Success | NoticeKind::Info => info!(notice = %self.message),
            NoticeKind::Error => warn!(notice = %self.message),
        }
    }
}

/// Notices waiting to be shown
#[derive(Clone, Default)]
pub struct NoticeBoard {
    pending: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeBoard {
    /// Subscribe a new board to every event that produces a notice
    pub fn attach(bus: &EventBus) -> Self {
        let board = Self::default();
        board.on(bus, |_: &DatasetFetchFailed| {
            Notice::new(NoticeKind::Error, "Erro ao carregar os dados da planilha.")
        });
        board.on(bus, |_: &BudgetRequestDispatched| {
            Notice::new(NoticeKind::Success, "E-mail enviado com sucesso!")
        });
        board.on(bus, |_: &BudgetRequestFailed| Notice::new(NoticeKind::Error, "Erro ao enviar e-mail."));
        board.on(bus, |e: &BudgetRequestReverted| {
            Notice::new(NoticeKind::Info, format!("Envio da PS {} desfeito.", e.record_key))
        });
        board.on(bus, |_: &ReportExported| Notice::new(NoticeKind::Success, "Relatório gerado com sucesso!"));
        board.on(bus, |_: &ReportEmpty| Notice::new(NoticeKind::Info, "Nenhum dado para exportar."));
        board.on(bus, |_: &ReportFailed| Notice::new(NoticeKind::Error, "Erro ao gerar o relatório."));
        board
    }

    fn on<E, F>(&self, bus: &EventBus, to_notice: F)
    where
        E: Event,
        F: Fn(&E) -> Notice + Send + Sync + 'static,
    {
        let pending = self.pending.clone();
        bus.subscribe(move |event: &E| pending.lock().push(to_notice(event)));
    }

    /// Take every pending notice, oldest first
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.pending.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_become_notices_in_order() {
        let bus = EventBus::new();
        let board = NoticeBoard::attach(&bus);

        bus.publish(DatasetFetchFailed {
            source_name: "sheet".to_string(),
            error: "timeout".to_string(),
        });
        bus.publish(BudgetRequestReverted {
            record_key: "7-CFN".to_string(),
        });
        bus.publish(ReportEmpty);

        let notices = board.drain();
        assert_eq!(notices.len(), 3);
        assert_eq!(notices[0].kind, NoticeKind::Error);
        assert_eq!(notices[1].message, "Envio da PS 7-CFN desfeito.");
        assert_eq!(notices[2], Notice::new(NoticeKind::Info, "Nenhum dado para exportar."));
        assert!(board.drain().is_empty());
    }

    #[test]
    fn test_unrelated_events_are_ignored() {
        let bus = EventBus::new();
        let board = NoticeBoard::attach(&bus);

        bus.publish(ps_core::events::FilterChanged {
            summary: "OM: TODAS | Oficina: TODAS | Status: TODOS".to_string(),
        });
        assert!(board.drain().is_empty());
    }
}
