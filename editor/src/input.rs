//! Pointer and keyboard state as delivered by the map frontend.

use bitflags::bitflags;
use glam::DVec2;
use serde::{Deserialize, Serialize};

// Origin is the top left of the map viewport
pub type ViewportPosition = DVec2;

bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
	#[repr(transparent)]
	pub struct ModifierKeys: u8 {
		const SHIFT           = 0b0000_0001;
		const ALT             = 0b0000_0010;
		const CONTROL         = 0b0000_0100;
		const META_OR_COMMAND = 0b0000_1000;
	}
}

impl ModifierKeys {
	pub const PLATFORM: Self = Self::CONTROL.union(Self::META_OR_COMMAND);

	/// Ctrl or Cmd is held. Edits made while it is held are batched and skip the overlay refresh.
	pub fn batch_edit(self) -> bool {
		self.intersects(Self::PLATFORM)
	}

	/// Ctrl or Cmd is the only modifier held.
	pub fn platform_only(self) -> bool {
		self.batch_edit() && !self.intersects(Self::SHIFT | Self::ALT)
	}
}

bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
	#[repr(transparent)]
	pub struct MouseKeys: u8 {
		const LEFT   = 0b0000_0001;
		const RIGHT  = 0b0000_0010;
		const MIDDLE = 0b0000_0100;
	}
}

impl MouseKeys {
	pub const NONE: Self = Self::empty();

	pub fn primary(self) -> bool {
		self.contains(Self::LEFT)
	}
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MouseState {
	pub position: ViewportPosition,
	pub mouse_keys: MouseKeys,
}

impl MouseState {
	pub fn from_position(x: f64, y: f64) -> Self {
		Self {
			position: (x, y).into(),
			mouse_keys: MouseKeys::default(),
		}
	}
}

/// The keys the editing session reacts to, named after `KeyboardEvent.key`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
	KeyZ,
	KeyY,
	Escape,
	Control,
	Meta,
	Shift,
	Alt,
	Unidentified,
}

impl Key {
	pub fn from_key_name(name: &str) -> Self {
		match name {
			"z" | "Z" => Key::KeyZ,
			"y" | "Y" => Key::KeyY,
			"Escape" | "Esc" => Key::Escape,
			"Control" => Key::Control,
			"Meta" | "OS" => Key::Meta,
			"Shift" => Key::Shift,
			"Alt" => Key::Alt,
			_ => Key::Unidentified,
		}
	}

	pub fn is_platform_modifier(self) -> bool {
		matches!(self, Key::Control | Key::Meta)
	}
}

/// Editing commands bound to keyboard shortcuts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shortcut {
	Undo,
	Redo,
	Abort,
}

impl Shortcut {
	pub fn from_key(key: Key, modifiers: ModifierKeys) -> Option<Self> {
		match key {
			Key::Escape => Some(Shortcut::Abort),
			Key::KeyZ if modifiers.batch_edit() && modifiers.contains(ModifierKeys::SHIFT) => Some(Shortcut::Redo),
			Key::KeyZ if modifiers.batch_edit() => Some(Shortcut::Undo),
			Key::KeyY if modifiers.batch_edit() => Some(Shortcut::Redo),
			_ => None,
		}
	}
}
