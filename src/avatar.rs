use serde::Serialize;
use utoipa::ToSchema;

/// Background/foreground pair used for an initials avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AvatarColor {
    /// Palette name
    pub name: &'static str,
    /// Background color (hex)
    pub background: &'static str,
    /// Text color (hex)
    pub text: &'static str,
    /// Border color (hex)
    pub border: &'static str,
}

pub const PALETTE: [AvatarColor; 8] = [
    AvatarColor { name: "pink", background: "#fce7f3", text: "#db2777", border: "#fbcfe8" },
    AvatarColor { name: "purple", background: "#f3e8ff", text: "#9333ea", border: "#e9d5ff" },
    AvatarColor { name: "indigo", background: "#e0e7ff", text: "#4f46e5", border: "#c7d2fe" },
    AvatarColor { name: "blue", background: "#dbeafe", text: "#2563eb", border: "#bfdbfe" },
    AvatarColor { name: "green", background: "#dcfce7", text: "#16a34a", border: "#bbf7d0" },
    AvatarColor { name: "yellow", background: "#fef9c3", text: "#ca8a04", border: "#fef08a" },
    AvatarColor { name: "red", background: "#fee2e2", text: "#dc2626", border: "#fecaca" },
    AvatarColor { name: "cyan", background: "#cffafe", text: "#0891b2", border: "#a5f3fc" },
];

/// Picks a palette entry from the sum of the name's UTF-16 code units.
pub fn color_for(name: &str) -> AvatarColor {
    let sum: u64 = name.encode_utf16().map(u64::from).sum();
    PALETTE[(sum % PALETTE.len() as u64) as usize]
}

/// First character of the name, uppercased. `?` when the name is blank.
pub fn initials(name: &str) -> String {
    match name.trim().chars().next() {
        Some(first) => first.to_uppercase().collect(),
        None => "?".to_string(),
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Avatar {
    /// Letters rendered inside the avatar
    pub initials: String,
    /// Colors assigned to the name
    pub color: AvatarColor,
}

impl Avatar {
    pub fn for_name(name: &str) -> Self {
        Self {
            initials: initials(name),
            color: color_for(name),
        }
    }
}
