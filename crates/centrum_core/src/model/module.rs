//! Module registry for the organizer dashboard.
//!
//! # Responsibility
//! - Address every feature area by a small stable integer id.
//! - Carry the display metadata the sidebar renders.
//!
//! # Invariants
//! - Module ids are stable; the cache partition key is derived from them.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable small-integer id of one organizer feature area.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ModuleId(pub u32);

impl Display for ModuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sidebar metadata for one module screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    pub id: ModuleId,
    pub name: &'static str,
    pub logo: &'static str,
}

/// All dashboard modules in sidebar order.
pub const MODULES: [ModuleInfo; 9] = [
    ModuleInfo {
        id: ModuleId(1),
        name: "To-Do",
        logo: "📌",
    },
    ModuleInfo {
        id: ModuleId(2),
        name: "Poznámky",
        logo: "📋",
    },
    ModuleInfo {
        id: ModuleId(3),
        name: "Kalendář",
        logo: "🐕",
    },
    ModuleInfo {
        id: ModuleId(4),
        name: "Velká kniha pohádek",
        logo: "🧚",
    },
    ModuleInfo {
        id: ModuleId(5),
        name: "Bodová ohodnocení",
        logo: "🎁",
    },
    ModuleInfo {
        id: ModuleId(6),
        name: "Domácnost",
        logo: "🏠",
    },
    ModuleInfo {
        id: ModuleId(7),
        name: "Expenses",
        logo: "💸",
    },
    ModuleInfo {
        id: ModuleId(8),
        name: "Watchlist",
        logo: "🍿",
    },
    ModuleInfo {
        id: ModuleId(9),
        name: "Nastavení",
        logo: "⚙️",
    },
];

/// Looks up registry metadata for one module id.
pub fn module_info(id: ModuleId) -> Option<&'static ModuleInfo> {
    MODULES.iter().find(|module| module.id == id)
}
