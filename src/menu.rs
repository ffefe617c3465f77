//! Menus and commands for auto-card-embed
//!
//! Menus are declared as static item lists, each item carrying a predicate
//! that is evaluated when the menu is shown. The host renders the resulting
//! items and reports the chosen action back.

use crate::classify::UrlCategory;
use crate::config::Settings;

// ─────────────────────────────────────────────────────────────────────────────
// Menu Items
// ─────────────────────────────────────────────────────────────────────────────

/// A menu entry ready for the host to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem<A> {
    pub title: &'static str,
    pub icon: &'static str,
    pub action: A,
}

/// An action that knows how it is labelled in a menu.
pub trait MenuAction: Copy {
    fn title(&self) -> &'static str;
    fn icon(&self) -> &'static str;
}

/// A declared entry, shown only when `visible` holds.
struct MenuEntry<A, C> {
    action: A,
    visible: fn(&C) -> bool,
}

fn build<A: MenuAction, C>(entries: &[MenuEntry<A, C>], context: &C) -> Vec<MenuItem<A>> {
    entries
        .iter()
        .filter(|entry| (entry.visible)(context))
        .map(|entry| MenuItem {
            title: entry.action.title(),
            icon: entry.action.icon(),
            action: entry.action,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Paste Menu
// ─────────────────────────────────────────────────────────────────────────────

/// Choices offered when a URL is pasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasteChoice {
    /// Replace the URL with a metadata card
    Card,
    /// Insert an `autoembed` block
    Embed,
    /// Insert `[title](url)`
    LinkWithTitle,
    /// Paste the URL unchanged
    PlainUrl,
}

impl MenuAction for PasteChoice {
    fn title(&self) -> &'static str {
        match self {
            PasteChoice::Card => "Card",
            PasteChoice::Embed => "Embed",
            PasteChoice::LinkWithTitle => "Link with Title",
            PasteChoice::PlainUrl => "Plain URL",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            PasteChoice::Card => "credit-card",
            PasteChoice::Embed => "play",
            PasteChoice::LinkWithTitle => "link",
            PasteChoice::PlainUrl => "type",
        }
    }
}

/// What the paste menu is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuContext {
    pub category: UrlCategory,
    pub embed_enabled: bool,
}

impl MenuContext {
    pub fn new(category: UrlCategory, settings: &Settings) -> Self {
        Self {
            category,
            embed_enabled: settings.embed_enabled(category),
        }
    }
}

const PASTE_MENU: [MenuEntry<PasteChoice, MenuContext>; 4] = [
    MenuEntry {
        action: PasteChoice::Card,
        visible: |ctx| ctx.category != UrlCategory::SocialPost,
    },
    MenuEntry {
        action: PasteChoice::Embed,
        visible: |ctx| ctx.category.is_embeddable() && ctx.embed_enabled,
    },
    MenuEntry {
        action: PasteChoice::LinkWithTitle,
        visible: |ctx| ctx.category != UrlCategory::SocialPost,
    },
    MenuEntry {
        action: PasteChoice::PlainUrl,
        visible: |_| true,
    },
];

/// Paste menu items for a URL category, in display order.
pub fn paste_menu(context: &MenuContext) -> Vec<MenuItem<PasteChoice>> {
    build(&PASTE_MENU, context)
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor Actions & Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Actions reachable from the editor context menu and the command palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorAction {
    /// Read the clipboard and paste it as a card
    PasteAsCard,
    /// Convert every URL in the selection into a card
    EnhanceSelection,
}

impl MenuAction for EditorAction {
    fn title(&self) -> &'static str {
        match self {
            EditorAction::PasteAsCard => "Paste URL as card",
            EditorAction::EnhanceSelection => "Enhance selected URL to card",
        }
    }

    fn icon(&self) -> &'static str {
        "link"
    }
}

/// Evaluation context for the editor context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EditorMenuContext {
    show_in_menu: bool,
    online: bool,
}

const EDITOR_MENU: [MenuEntry<EditorAction, EditorMenuContext>; 2] = [
    MenuEntry {
        action: EditorAction::PasteAsCard,
        visible: |ctx| ctx.show_in_menu,
    },
    MenuEntry {
        action: EditorAction::EnhanceSelection,
        visible: |ctx| ctx.show_in_menu && ctx.online,
    },
];

/// Context-menu items for the editor.
pub fn editor_menu(settings: &Settings, online: bool) -> Vec<MenuItem<EditorAction>> {
    let context = EditorMenuContext {
        show_in_menu: settings.show_in_menu_item,
        online,
    };
    build(&EDITOR_MENU, &context)
}

/// Keyboard modifier in a command hotkey. `Mod` is Ctrl or Cmd per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Mod,
    Shift,
    Alt,
}

impl Modifier {
    pub fn label(&self) -> &'static str {
        match self {
            Modifier::Mod => "Mod",
            Modifier::Shift => "Shift",
            Modifier::Alt => "Alt",
        }
    }
}

/// A default key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub modifiers: &'static [Modifier],
    pub key: &'static str,
}

impl std::fmt::Display for Hotkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for modifier in self.modifiers {
            write!(f, "{}+", modifier.label())?;
        }
        f.write_str(self.key)
    }
}

/// A command registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub hotkeys: &'static [Hotkey],
    pub action: EditorAction,
    /// Command is hidden while the host is offline
    pub requires_online: bool,
}

impl CommandSpec {
    /// Name shown in the command palette.
    pub fn name(&self) -> &'static str {
        self.action.title()
    }

    pub fn is_available(&self, online: bool) -> bool {
        !self.requires_online || online
    }
}

const COMMANDS: [CommandSpec; 2] = [
    CommandSpec {
        id: "auto-card-embed-paste-as-card",
        hotkeys: &[],
        action: EditorAction::PasteAsCard,
        requires_online: false,
    },
    CommandSpec {
        id: "auto-card-embed-enhance-selected-url",
        hotkeys: &[Hotkey {
            modifiers: &[Modifier::Mod, Modifier::Shift],
            key: "E",
        }],
        action: EditorAction::EnhanceSelection,
        requires_online: true,
    },
];

/// All commands to register at load.
pub fn commands() -> &'static [CommandSpec] {
    &COMMANDS
}

/// Look up a command by id.
pub fn command(id: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.id == id)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(category: UrlCategory, settings: &Settings) -> Vec<PasteChoice> {
        paste_menu(&MenuContext::new(category, settings))
            .into_iter()
            .map(|item| item.action)
            .collect()
    }

    #[test]
    fn test_general_url_menu() {
        assert_eq!(
            choices(UrlCategory::General, &Settings::default()),
            vec![
                PasteChoice::Card,
                PasteChoice::LinkWithTitle,
                PasteChoice::PlainUrl
            ]
        );
    }

    #[test]
    fn test_video_url_menu() {
        assert_eq!(
            choices(UrlCategory::VideoProvider, &Settings::default()),
            vec![
                PasteChoice::Card,
                PasteChoice::Embed,
                PasteChoice::LinkWithTitle,
                PasteChoice::PlainUrl
            ]
        );
    }

    #[test]
    fn test_social_url_menu_has_no_card_or_link() {
        assert_eq!(
            choices(UrlCategory::SocialPost, &Settings::default()),
            vec![PasteChoice::Embed, PasteChoice::PlainUrl]
        );
    }

    #[test]
    fn test_disabled_embed_hidden() {
        let settings = Settings {
            enable_youtube_embed: false,
            enable_twitter_embed: false,
            ..Settings::default()
        };
        assert!(!choices(UrlCategory::VideoProvider, &settings).contains(&PasteChoice::Embed));
        assert_eq!(
            choices(UrlCategory::SocialPost, &settings),
            vec![PasteChoice::PlainUrl]
        );
    }

    #[test]
    fn test_menu_titles_match_choices() {
        for item in paste_menu(&MenuContext::new(UrlCategory::VideoProvider, &Settings::default())) {
            assert_eq!(item.title, item.action.title());
            assert_eq!(item.icon, item.action.icon());
        }
    }

    #[test]
    fn test_menu_items_labelled_from_action() {
        let titles: Vec<_> = paste_menu(&MenuContext::new(UrlCategory::General, &Settings::default()))
            .iter()
            .map(|item| (item.title, item.icon))
            .collect();
        assert_eq!(
            titles,
            vec![
                ("Card", "credit-card"),
                ("Link with Title", "link"),
                ("Plain URL", "type")
            ]
        );

        let items = editor_menu(&Settings::default(), true);
        assert_eq!(items[0].title, "Paste URL as card");
        assert_eq!(items[1].title, "Enhance selected URL to card");
    }

    #[test]
    fn test_editor_menu() {
        let settings = Settings::default();
        let online: Vec<_> = editor_menu(&settings, true).iter().map(|i| i.action).collect();
        assert_eq!(
            online,
            vec![EditorAction::PasteAsCard, EditorAction::EnhanceSelection]
        );

        let offline: Vec<_> = editor_menu(&settings, false).iter().map(|i| i.action).collect();
        assert_eq!(offline, vec![EditorAction::PasteAsCard]);

        let hidden = Settings {
            show_in_menu_item: false,
            ..Settings::default()
        };
        assert!(editor_menu(&hidden, true).is_empty());
    }

    #[test]
    fn test_commands() {
        let enhance = command("auto-card-embed-enhance-selected-url").unwrap();
        assert_eq!(enhance.hotkeys[0].to_string(), "Mod+Shift+E");
        assert!(!enhance.is_available(false));
        assert!(enhance.is_available(true));
        assert_eq!(enhance.name(), "Enhance selected URL to card");

        let paste = command("auto-card-embed-paste-as-card").unwrap();
        assert!(paste.hotkeys.is_empty());
        assert!(paste.is_available(false));
        assert_eq!(commands().len(), 2);
    }
}
