//! Declarative screen registry
//!
//! Screens are described as static node tables (see [`screens`]). At
//! startup the registry publishes the name tables to the flow engine,
//! installs the theme and materializes every screen exactly once. Per
//! scheduler iteration it dispatches the active screen's tick routine.
//!
//! Screen and object identities are enumerations; the name tables are
//! derived from them, so table order and internal indices cannot drift.

pub mod node;
pub mod screens;
pub mod table;

pub use node::{EventRoute, Node, ScreenDescriptor, TickContext};
pub use screens::SCREENS;
pub use table::{ObjectTable, Registry};

/// Number of registered screens
pub const SCREEN_COUNT: usize = 2;

/// Number of externally addressed objects
pub const OBJECT_COUNT: usize = 4;

/// Largest node table a single screen may have
pub const MAX_NODES: usize = 16;

/// Registry errors
///
/// All of these are configuration defects: the firmware halts on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// Screen index outside `[0, SCREEN_COUNT)`
    ScreenOutOfRange(usize),
    /// `construct_all` called a second time
    AlreadyConstructed,
    /// Screens have not been constructed yet
    NotConstructed,
    /// Node table is inconsistent (bad parent, missing root, wrong slot)
    MalformedScreen(ScreenId),
    /// The GUI engine rejected a construction call
    Engine(ScreenId),
}

/// Registered screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ScreenId {
    /// Clock / home screen
    Main = 1,
    /// Settings menu
    Menu = 2,
}

impl ScreenId {
    /// All screens in construction (and name table) order
    pub const ALL: [ScreenId; SCREEN_COUNT] = [ScreenId::Main, ScreenId::Menu];

    /// Stable 1-based screen id
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// 0-based index into the registry and the screen name table
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Name published to the flow engine
    pub const fn name(self) -> &'static str {
        match self {
            ScreenId::Main => "Main",
            ScreenId::Menu => "Menu",
        }
    }

    /// Look up a screen by 0-based index
    pub fn from_index(index: usize) -> Result<Self, RegistryError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(RegistryError::ScreenOutOfRange(index))
    }

    /// Look up a screen by 1-based id
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(ScreenId::Main),
            2 => Some(ScreenId::Menu),
            _ => None,
        }
    }
}

/// Widgets that need external addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ObjectSlot {
    /// Main screen root
    Main = 0,
    /// Menu screen root
    Menu = 1,
    /// Settings image button on the main screen
    BtnSetting = 2,
    /// Clock label on the main screen
    Obj0 = 3,
}

impl ObjectSlot {
    /// All slots in object name table order
    pub const ALL: [ObjectSlot; OBJECT_COUNT] = [
        ObjectSlot::Main,
        ObjectSlot::Menu,
        ObjectSlot::BtnSetting,
        ObjectSlot::Obj0,
    ];

    /// Index into the object name table
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name published to the flow engine
    pub const fn name(self) -> &'static str {
        match self {
            ObjectSlot::Main => "main",
            ObjectSlot::Menu => "menu",
            ObjectSlot::BtnSetting => "btn_setting",
            ObjectSlot::Obj0 => "obj0",
        }
    }
}

/// Screen name table, indexed by [`ScreenId::index`]
pub static SCREEN_NAMES: [&str; SCREEN_COUNT] = [ScreenId::Main.name(), ScreenId::Menu.name()];

/// Object name table, indexed by [`ObjectSlot::index`]
pub static OBJECT_NAMES: [&str; OBJECT_COUNT] = [
    ObjectSlot::Main.name(),
    ObjectSlot::Menu.name(),
    ObjectSlot::BtnSetting.name(),
    ObjectSlot::Obj0.name(),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_ids() {
        assert_eq!(ScreenId::Main.id(), 1);
        assert_eq!(ScreenId::Menu.id(), 2);
        assert_eq!(ScreenId::Main.index(), 0);
        assert_eq!(ScreenId::Menu.index(), 1);
        assert_eq!(ScreenId::from_id(2), Some(ScreenId::Menu));
        assert_eq!(ScreenId::from_id(0), None);
    }

    #[test]
    fn test_screen_index_bounds() {
        assert_eq!(ScreenId::from_index(0), Ok(ScreenId::Main));
        assert_eq!(ScreenId::from_index(1), Ok(ScreenId::Menu));
        assert_eq!(
            ScreenId::from_index(2),
            Err(RegistryError::ScreenOutOfRange(2))
        );
    }

    #[test]
    fn test_name_tables_follow_enum_order() {
        assert_eq!(SCREEN_NAMES, ["Main", "Menu"]);
        assert_eq!(OBJECT_NAMES, ["main", "menu", "btn_setting", "obj0"]);

        for (i, screen) in ScreenId::ALL.iter().enumerate() {
            assert_eq!(screen.index(), i);
            assert_eq!(SCREEN_NAMES[i], screen.name());
        }
        for (i, slot) in ObjectSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
            assert_eq!(OBJECT_NAMES[i], slot.name());
        }
    }
}
