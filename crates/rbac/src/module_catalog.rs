//! ModuleCatalog - Fixture kinds grouped to their actions for menus

use crate::action::Action;
use crate::permission::{Permission, PolicyTable};
use serde::Serialize;

/// A presentation group of related actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Module {
    Door,
    Window,
    Light,
    Climate,
    AwayMode,
    Lighting,
}

impl Module {
    pub fn display_name(&self) -> &'static str {
        match self {
            Module::Door => "Doors",
            Module::Window => "Windows",
            Module::Light => "Lights",
            Module::Climate => "Climate",
            Module::AwayMode => "Away mode",
            Module::Lighting => "Lighting automation",
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One menu group filtered for a permission
#[derive(Debug, Clone, Serialize)]
pub struct MenuEntry {
    pub module: Module,
    pub actions: Vec<Action>,
}

/// Read-only view of modules and their actions
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleCatalog;

impl ModuleCatalog {
    pub fn new() -> Self {
        Self
    }

    /// All modules, in menu order
    pub fn items(&self) -> &'static [Module] {
        &[
            Module::Door,
            Module::Window,
            Module::Light,
            Module::Climate,
            Module::AwayMode,
            Module::Lighting,
        ]
    }

    /// Actions offered under a module
    pub fn actions_for(&self, module: Module) -> &'static [Action] {
        match module {
            Module::Door => &[Action::ToggleDoorOpen, Action::ToggleDoorLock],
            Module::Window => &[Action::ToggleWindowOpen, Action::ToggleWindowObstruct],
            Module::Light => &[Action::ToggleLight],
            Module::Climate => &[Action::ChangeTemperature],
            Module::AwayMode => &[
                Action::SetAwayMode,
                Action::SetAwayModeLights,
                Action::SetAwayModeDelay,
            ],
            Module::Lighting => &[Action::ToggleAutoLight],
        }
    }

    /// The module an action is listed under
    pub fn module_of(&self, action: Action) -> Module {
        match action {
            Action::ToggleDoorOpen | Action::ToggleDoorLock => Module::Door,
            Action::ToggleWindowOpen | Action::ToggleWindowObstruct => Module::Window,
            Action::ToggleLight => Module::Light,
            Action::ChangeTemperature => Module::Climate,
            Action::SetAwayMode | Action::SetAwayModeLights | Action::SetAwayModeDelay => {
                Module::AwayMode
            }
            Action::ToggleAutoLight => Module::Lighting,
        }
    }

    /// Menu groups containing only the actions a permission may perform.
    /// Modules left empty are omitted.
    pub fn menu_for(&self, permission: &Permission, table: &PolicyTable) -> Vec<MenuEntry> {
        self.items()
            .iter()
            .filter_map(|module| {
                let actions: Vec<Action> = self
                    .actions_for(*module)
                    .iter()
                    .copied()
                    .filter(|a| permission.authorize(table, *a).is_ok())
                    .collect();
                (!actions.is_empty()).then_some(MenuEntry {
                    module: *module,
                    actions,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_listed_exactly_once() {
        let catalog = ModuleCatalog::new();

        for action in Action::all() {
            let listed = catalog
                .items()
                .iter()
                .filter(|m| catalog.actions_for(**m).contains(action))
                .count();
            assert_eq!(listed, 1, "{:?} listed {} times", action, listed);
        }
    }

    #[test]
    fn test_module_of_matches_actions_for() {
        let catalog = ModuleCatalog::new();

        for module in catalog.items() {
            for action in catalog.actions_for(*module) {
                assert_eq!(catalog.module_of(*action), *module);
            }
        }
    }

    #[test]
    fn test_parent_menu_has_every_module() {
        let catalog = ModuleCatalog::new();
        let table = PolicyTable::new();

        let menu = catalog.menu_for(&Permission::parent(), &table);
        assert_eq!(menu.len(), catalog.items().len());
    }

    #[test]
    fn test_stranger_menu_is_empty() {
        let catalog = ModuleCatalog::new();
        let table = PolicyTable::new();

        assert!(catalog.menu_for(&Permission::stranger(), &table).is_empty());
    }

    #[test]
    fn test_child_menu_filters_actions() {
        let catalog = ModuleCatalog::new();
        let table = PolicyTable::new();

        let menu = catalog.menu_for(&Permission::child(), &table);
        let doors = menu.iter().find(|e| e.module == Module::Door).unwrap();

        assert_eq!(doors.actions, vec![Action::ToggleDoorOpen]);
        assert!(menu.iter().all(|e| e.module != Module::AwayMode));
    }
}
