//! Display router.
//!
//! Consumes display intents and mutates one of four independent region logs.
//! Terminal and Profile are append-only histories; WorksList and WorkDetail
//! hold the current result set and are replaced wholesale. The router holds
//! no session knowledge: it applies intents in the order they arrive.

use super::intent::{DisplayIntent, IntentKind, Region, Style};

/// One rendered entry in a region log.
#[derive(Debug, Clone)]
pub struct RegionEntry {
    pub content: String,
    pub style: Style,
    pub typed: bool,
}

/// Append-only (or replace-on-write) log backing one region.
#[derive(Debug, Default)]
pub struct RegionLog {
    entries: Vec<RegionEntry>,
}

impl RegionLog {
    pub fn entries(&self) -> &[RegionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, intent: &DisplayIntent) {
        self.entries.push(RegionEntry {
            content: intent.content.clone(),
            style: intent.style,
            typed: intent.typed,
        });
    }
}

/// The four region logs plus the routing rule.
#[derive(Debug, Default)]
pub struct DisplayRouter {
    terminal: RegionLog,
    profile: RegionLog,
    works_list: RegionLog,
    work_detail: RegionLog,
}

impl DisplayRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self, region: Region) -> &RegionLog {
        match region {
            Region::Terminal => &self.terminal,
            Region::Profile => &self.profile,
            Region::WorksList => &self.works_list,
            Region::WorkDetail => &self.work_detail,
        }
    }

    fn region_mut(&mut self, region: Region) -> &mut RegionLog {
        match region {
            Region::Terminal => &mut self.terminal,
            Region::Profile => &mut self.profile,
            Region::WorksList => &mut self.works_list,
            Region::WorkDetail => &mut self.work_detail,
        }
    }

    /// Apply one intent to its target region.
    pub fn route(&mut self, intent: &DisplayIntent) {
        let log = self.region_mut(intent.region);
        match intent.kind {
            IntentKind::Append => log.push(intent),
            IntentKind::Replace => {
                log.entries.clear();
                log.push(intent);
            }
            IntentKind::Clear => log.entries.clear(),
        }
    }

    /// Apply a batch in order.
    pub fn route_all<'a>(&mut self, intents: impl IntoIterator<Item = &'a DisplayIntent>) {
        for intent in intents {
            self.route(intent);
        }
    }
}
